//! Transform definitions that can appear in a pipeline.
//!
//! - Truelight transforms (realized by an external engine)
//! - Matrix transforms (primaries conversion, scaling)

use crate::direction::TransformDirection;
use crate::truelight::TruelightTransform;

/// Color transform definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Truelight engine transform.
    Truelight(TruelightTransform),

    /// 4x4 matrix transform.
    Matrix(MatrixTransform),
}

impl Transform {
    /// Creates a matrix transform from a row-major 4x4 array.
    pub fn matrix(m: [f64; 16]) -> Self {
        Self::Matrix(MatrixTransform {
            matrix: m,
            ..Default::default()
        })
    }

    /// Serialized type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Truelight(_) => "TruelightTransform",
            Self::Matrix(_) => "MatrixTransform",
        }
    }

    /// Returns the transform's own direction.
    pub fn direction(&self) -> TransformDirection {
        match self {
            Self::Truelight(t) => t.direction(),
            Self::Matrix(t) => t.direction,
        }
    }

    /// Sets the transform's own direction.
    pub fn set_direction(&mut self, direction: TransformDirection) {
        match self {
            Self::Truelight(t) => t.set_direction(direction),
            Self::Matrix(t) => t.direction = direction,
        }
    }

    /// Returns the inverse of this transform.
    pub fn inverse(mut self) -> Self {
        let dir = self.direction().inverse();
        self.set_direction(dir);
        self
    }
}

impl From<TruelightTransform> for Transform {
    fn from(t: TruelightTransform) -> Self {
        Self::Truelight(t)
    }
}

impl From<MatrixTransform> for Transform {
    fn from(t: MatrixTransform) -> Self {
        Self::Matrix(t)
    }
}

/// Matrix transform with offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTransform {
    /// 4x4 matrix (row-major).
    pub matrix: [f64; 16],
    /// RGBA offset.
    pub offset: [f64; 4],
    /// Direction.
    pub direction: TransformDirection,
}

impl MatrixTransform {
    /// Row-major identity.
    pub const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];

    /// Uniform RGB scale.
    pub fn scale(s: f64) -> Self {
        let mut matrix = Self::IDENTITY;
        matrix[0] = s;
        matrix[5] = s;
        matrix[10] = s;
        Self {
            matrix,
            ..Default::default()
        }
    }

    /// Returns true if the matrix is identity.
    pub fn is_identity_matrix(&self) -> bool {
        self.matrix == Self::IDENTITY
    }

    /// Returns true if the offset is all zero.
    pub fn is_zero_offset(&self) -> bool {
        self.offset.iter().all(|v| *v == 0.0)
    }
}

impl Default for MatrixTransform {
    fn default() -> Self {
        Self {
            matrix: Self::IDENTITY,
            offset: [0.0; 4],
            direction: TransformDirection::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_flips_direction_only() {
        let mut tl = TruelightTransform::new();
        tl.set_print("internal-LowContrast");
        let t = Transform::from(tl.clone()).inverse();

        assert_eq!(t.direction(), TransformDirection::Inverse);
        match t {
            Transform::Truelight(inner) => assert_eq!(inner.print(), tl.print()),
            other => panic!("unexpected {:?}", other),
        }

        let m = Transform::matrix(MatrixTransform::IDENTITY).inverse().inverse();
        assert_eq!(m.direction(), TransformDirection::Forward);
    }

    #[test]
    fn type_names() {
        assert_eq!(Transform::from(TruelightTransform::new()).type_name(), "TruelightTransform");
        assert_eq!(Transform::from(MatrixTransform::scale(2.0)).type_name(), "MatrixTransform");
    }
}
