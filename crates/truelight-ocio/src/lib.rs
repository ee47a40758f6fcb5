//! Truelight transforms for OCIO-style color pipelines.
//!
//! This crate provides:
//! - [`TruelightTransform`], the descriptor of a Truelight engine transform
//! - Direction composition between a pipeline and the transforms it embeds
//! - Op building: expanding transforms into an append-only [`OpVec`]
//! - The [`engine`] seam that realizes Truelight transforms
//! - The serialized `!<TruelightTransform> {...}` form ([`codec`])
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use truelight_ocio::engine::TruelightEngine;
//! use truelight_ocio::{
//!     build_ops, Config, OpVec, ProcessorOp, TlResult, TransformDirection, TruelightTransform,
//! };
//!
//! // An engine that realizes every transform as a single identity matrix.
//! #[derive(Debug)]
//! struct Passthrough;
//!
//! impl TruelightEngine for Passthrough {
//!     fn name(&self) -> &str { "passthrough" }
//!     fn is_available(&self) -> bool { true }
//!     fn create_ops(&self, ops: &mut OpVec, _: &TruelightTransform, _: TransformDirection) -> TlResult<()> {
//!         ops.push(ProcessorOp::Matrix {
//!             matrix: [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
//!             offset: [0.0; 4],
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let config = Config::new().with_engine(Arc::new(Passthrough));
//!
//! let mut tl = TruelightTransform::new();
//! tl.set_print("internal-LowContrast");
//! tl.set_display("sRGB");
//!
//! let mut ops = OpVec::new();
//! build_ops(&mut ops, &config, &tl.into(), TransformDirection::Inverse).unwrap();
//! assert_eq!(ops.len(), 1);
//! ```
//!
//! # Engines
//!
//! Without an engine, building a Truelight transform fails with
//! [`TlError::UnsupportedEngine`] rather than producing a pass-through
//! pipeline. [`engine::EngineSettings::from_env`] picks up an external
//! cube-baking program from `TRUELIGHT_ENGINE`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod colorspace;
mod config;
mod direction;
mod error;
mod op;
mod processor;
mod transform;
mod truelight;

pub mod codec;
pub mod engine;

// Re-exports
pub use builder::{BuildOps, build_ops, build_truelight_ops};
pub use colorspace::ColorSpace;
pub use config::Config;
pub use direction::{ColorSpaceDirection, TransformDirection, combine_directions};
pub use error::{TlError, TlResult};
pub use op::{OpVec, ProcessorOp};
pub use processor::Processor;
pub use transform::{MatrixTransform, Transform};
pub use truelight::{DEFAULT_CONFIG_ROOT, DEFAULT_CUBE_INPUT, TruelightField, TruelightTransform};
