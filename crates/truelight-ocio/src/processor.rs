//! Compiled processors.
//!
//! A processor holds the ops built for a conversion and applies them to
//! pixels in order.

use tracing::warn;

use crate::builder::build_ops;
use crate::config::Config;
use crate::direction::TransformDirection;
use crate::error::TlResult;
use crate::op::{OpVec, ProcessorOp};
use crate::transform::Transform;

/// Compiled transform processor.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    ops: OpVec,
}

impl Processor {
    /// Wraps already-built ops.
    ///
    /// A LUT whose table does not match its size passes pixels through
    /// unchanged.
    pub fn from_ops(ops: OpVec) -> Self {
        for (index, op) in ops.iter().enumerate().filter(|(_, op)| !op.is_well_formed()) {
            warn!(index, kind = op.kind(), "malformed op is skipped when applying");
        }
        Self { ops }
    }

    /// Builds a processor for a single transform.
    pub fn from_transform(
        transform: &Transform,
        config: &Config,
        direction: TransformDirection,
    ) -> TlResult<Self> {
        let mut ops = OpVec::new();
        build_ops(&mut ops, config, transform, direction)?;
        Ok(Self { ops })
    }

    /// Returns the op list.
    #[inline]
    pub fn ops(&self) -> &[ProcessorOp] {
        self.ops.as_slice()
    }

    /// Number of ops.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if there are no ops.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns true if every op is an identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(ProcessorOp::is_identity)
    }

    /// Applies the processor to RGB pixels in place.
    pub fn apply_rgb(&self, pixels: &mut [[f32; 3]]) {
        for px in pixels.iter_mut() {
            *px = self.ops.iter().fold(*px, |rgb, op| op.apply(rgb));
        }
    }
}
