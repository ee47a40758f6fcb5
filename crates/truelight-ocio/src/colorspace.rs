//! Color space definitions.
//!
//! A color space names a pixel encoding and says how to get to and from the
//! reference space. Either side may be missing; the other one is then used in
//! the inverse direction.
//!
//! # Example
//!
//! ```
//! use truelight_ocio::{ColorSpace, ColorSpaceDirection, TruelightTransform};
//!
//! let mut tl = TruelightTransform::new();
//! tl.set_display("sRGB");
//!
//! let cs = ColorSpace::new("sRGB")
//!     .with_family("srgb")
//!     .with_transform(tl.into(), ColorSpaceDirection::FromReference);
//!
//! assert!(cs.transform(ColorSpaceDirection::FromReference).is_some());
//! assert!(cs.transform(ColorSpaceDirection::ToReference).is_none());
//! assert_eq!(cs.family(), "srgb");
//! ```

use crate::direction::ColorSpaceDirection;
use crate::transform::Transform;

/// A named color space.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpace {
    name: String,
    family: String,
    description: String,
    to_reference: Option<Transform>,
    from_reference: Option<Transform>,
}

impl ColorSpace {
    /// Creates an empty color space.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: String::new(),
            description: String::new(),
            to_reference: None,
            from_reference: None,
        }
    }

    /// Sets the family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Attaches a transform on one side.
    pub fn with_transform(mut self, transform: Transform, dir: ColorSpaceDirection) -> Self {
        self.set_transform(transform, dir);
        self
    }

    /// Attaches a transform on one side, replacing any previous one.
    pub fn set_transform(&mut self, transform: Transform, dir: ColorSpaceDirection) {
        match dir {
            ColorSpaceDirection::ToReference => self.to_reference = Some(transform),
            ColorSpaceDirection::FromReference => self.from_reference = Some(transform),
        }
    }

    /// Returns the transform on one side.
    pub fn transform(&self, dir: ColorSpaceDirection) -> Option<&Transform> {
        match dir {
            ColorSpaceDirection::ToReference => self.to_reference.as_ref(),
            ColorSpaceDirection::FromReference => self.from_reference.as_ref(),
        }
    }

    /// Returns the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the family.
    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::MatrixTransform;

    #[test]
    fn builder_and_getters() {
        let mut cs = ColorSpace::new("ACEScg")
            .with_family("aces")
            .with_description("ACES AP1 linear")
            .with_transform(MatrixTransform::scale(2.0).into(), ColorSpaceDirection::ToReference);
        assert_eq!(cs.name(), "ACEScg");
        assert_eq!(cs.family(), "aces");
        assert_eq!(cs.description(), "ACES AP1 linear");

        cs.set_transform(MatrixTransform::scale(3.0).into(), ColorSpaceDirection::ToReference);
        assert_eq!(
            cs.transform(ColorSpaceDirection::ToReference),
            Some(&Transform::from(MatrixTransform::scale(3.0)))
        );
        assert!(cs.transform(ColorSpaceDirection::FromReference).is_none());
    }
}
