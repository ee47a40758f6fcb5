//! Expansion of transforms into pipeline ops.
//!
//! Every transform type implements [`BuildOps`]: given the pipeline context
//! and the ambient direction, it appends its own stages to an [`OpVec`].
//! Pipeline assembly goes through [`build_ops`].

use tracing::{debug, warn};

use crate::config::Config;
use crate::direction::{TransformDirection, combine_directions};
use crate::error::{TlError, TlResult};
use crate::op::{OpVec, ProcessorOp};
use crate::transform::{MatrixTransform, Transform};
use crate::truelight::TruelightTransform;

/// Appends the ops realizing a transform.
pub trait BuildOps {
    /// Appends this transform's stages, composed with the ambient direction.
    ///
    /// On error nothing is appended.
    fn build_ops(&self, ops: &mut OpVec, config: &Config, dir: TransformDirection) -> TlResult<()>;
}

/// Appends the ops for `transform` under the ambient direction `dir`.
pub fn build_ops(
    ops: &mut OpVec,
    config: &Config,
    transform: &Transform,
    dir: TransformDirection,
) -> TlResult<()> {
    transform.build_ops(ops, config, dir)
}

/// Appends the engine-produced ops for a Truelight transform.
///
/// Fails with [`TlError::UnsupportedEngine`] when the config's engine is not
/// available; engine rejections propagate unchanged. The engine's output is
/// appended as one block only after it succeeds.
pub fn build_truelight_ops(
    ops: &mut OpVec,
    config: &Config,
    transform: &TruelightTransform,
    dir: TransformDirection,
) -> TlResult<()> {
    let combined = combine_directions(dir, transform.direction());
    let engine = config.engine();

    if !engine.is_available() {
        warn!(engine = engine.name(), %transform, "truelight engine unavailable");
        return Err(TlError::unsupported(
            engine.name(),
            "Truelight support is not available; configure an engine before building this transform",
        ));
    }

    let mut block = OpVec::new();
    engine.create_ops(&mut block, transform, combined)?;

    debug!(
        engine = engine.name(),
        ambient = %dir,
        effective = %combined,
        appended = block.len(),
        "built truelight ops"
    );
    ops.append(&mut block);
    Ok(())
}

impl BuildOps for TruelightTransform {
    fn build_ops(&self, ops: &mut OpVec, config: &Config, dir: TransformDirection) -> TlResult<()> {
        build_truelight_ops(ops, config, self, dir)
    }
}

impl BuildOps for MatrixTransform {
    fn build_ops(&self, ops: &mut OpVec, _config: &Config, dir: TransformDirection) -> TlResult<()> {
        let combined = combine_directions(dir, self.direction);

        let (matrix, offset) = if combined == TransformDirection::Inverse {
            invert_matrix(&self.matrix, &self.offset)?
        } else {
            (self.matrix.map(|v| v as f32), self.offset.map(|v| v as f32))
        };

        ops.push(ProcessorOp::Matrix { matrix, offset });
        Ok(())
    }
}

impl BuildOps for Transform {
    fn build_ops(&self, ops: &mut OpVec, config: &Config, dir: TransformDirection) -> TlResult<()> {
        match self {
            Transform::Truelight(t) => t.build_ops(ops, config, dir),
            Transform::Matrix(t) => t.build_ops(ops, config, dir),
        }
    }
}

/// Inverts a row-major matrix + offset pair: `M⁻¹` and `-M⁻¹·offset`.
fn invert_matrix(m: &[f64; 16], offset: &[f64; 4]) -> TlResult<([f32; 16], [f32; 4])> {
    // glam is column-major; load the transpose.
    let mat = glam::DMat4::from_cols_array(m).transpose();
    if mat.determinant().abs() < 1e-10 {
        return Err(TlError::InvalidTransform {
            reason: "cannot invert singular matrix (determinant near zero)".into(),
        });
    }

    let inv = mat.inverse();
    let inv_offset = -(inv * glam::DVec4::from_array(*offset));
    let inv_rows = inv.transpose().to_cols_array();

    Ok((inv_rows.map(|v| v as f32), inv_offset.to_array().map(|v| v as f32)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TruelightEngine;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};
    use TransformDirection::{Forward, Inverse};

    #[derive(Debug, Default)]
    struct Recording {
        seen: Mutex<Vec<TransformDirection>>,
    }

    impl TruelightEngine for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn create_ops(
            &self,
            ops: &mut OpVec,
            _transform: &TruelightTransform,
            dir: TransformDirection,
        ) -> TlResult<()> {
            self.seen.lock().unwrap().push(dir);
            ops.push(ProcessorOp::Matrix {
                matrix: glam::Mat4::IDENTITY.to_cols_array(),
                offset: [0.0; 4],
            });
            Ok(())
        }
    }

    #[test]
    fn engine_sees_combined_direction() {
        let engine = Arc::new(Recording::default());
        let config = Config::new().with_engine(engine.clone());

        for (ambient, own) in [(Forward, Forward), (Forward, Inverse), (Inverse, Forward), (Inverse, Inverse)] {
            let mut tl = TruelightTransform::new();
            tl.set_direction(own);
            let mut ops = OpVec::new();
            build_truelight_ops(&mut ops, &config, &tl, ambient).unwrap();
            assert_eq!(ops.len(), 1);
        }

        assert_eq!(*engine.seen.lock().unwrap(), vec![Forward, Inverse, Inverse, Forward]);
    }

    #[test]
    fn default_config_fails_loudly() {
        let config = Config::new();
        let mut ops = OpVec::new();
        let err = build_ops(&mut ops, &config, &TruelightTransform::new().into(), Forward).unwrap_err();
        assert!(matches!(err, TlError::UnsupportedEngine { .. }));
        assert!(ops.is_empty());
    }

    #[test]
    fn matrix_inverse_round_trips() {
        let mut m = MatrixTransform::scale(2.0);
        m.matrix[1] = 0.5;
        m.offset = [0.1, -0.2, 0.3, 0.0];

        let config = Config::new();
        let mut ops = OpVec::new();
        m.build_ops(&mut ops, &config, Forward).unwrap();
        m.build_ops(&mut ops, &config, Inverse).unwrap();

        let rgb = [0.25_f32, 0.5, 0.75];
        let out = ops.iter().fold(rgb, |px, op| op.apply(px));
        for c in 0..3 {
            assert_relative_eq!(out[c], rgb[c], epsilon = 1e-5);
        }
    }

    #[test]
    fn singular_matrix_cannot_invert() {
        let m = MatrixTransform::scale(0.0);
        let mut ops = OpVec::new();
        let err = m.build_ops(&mut ops, &Config::new(), Inverse).unwrap_err();
        assert!(matches!(err, TlError::InvalidTransform { .. }));
        assert!(ops.is_empty());
    }
}
