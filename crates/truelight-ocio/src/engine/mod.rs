//! Engine collaborators that realize Truelight transforms.
//!
//! The crate never evaluates Truelight math itself. An engine receives the
//! descriptor and the effective direction and appends the ops that reproduce
//! it. Which engine a pipeline uses is decided by its [`Config`](crate::Config):
//!
//! - [`UnavailableEngine`]: the default; every build fails with
//!   [`TlError::UnsupportedEngine`].
//! - [`CommandEngine`]: runs an external cube-baking program and loads the
//!   3D LUT it prints.
//!
//! # Example
//!
//! ```
//! use truelight_ocio::engine::{EngineSettings, TruelightEngine};
//!
//! let engine = EngineSettings::default().into_engine();
//! assert!(!engine.is_available());
//! ```

mod command;
mod cube;

use std::env;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::direction::TransformDirection;
use crate::error::{TlError, TlResult};
use crate::op::OpVec;
use crate::truelight::TruelightTransform;

pub use command::CommandEngine;
pub use cube::{MAX_CUBE_SIZE, parse_cube_3d};

/// Environment variable naming the engine program.
pub const ENV_ENGINE: &str = "TRUELIGHT_ENGINE";
/// Environment variable with the engine timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "TRUELIGHT_TIMEOUT_MS";
/// Environment variable with the baked cube size.
pub const ENV_CUBE_SIZE: &str = "TRUELIGHT_CUBE_SIZE";

/// Engine that turns a Truelight descriptor into ops.
pub trait TruelightEngine: Debug + Send + Sync {
    /// Engine name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the engine can be used in this deployment.
    fn is_available(&self) -> bool;

    /// Appends the ops realizing `transform` in direction `dir`.
    ///
    /// Field values the engine cannot honor are reported as
    /// [`TlError::InvalidConfiguration`].
    fn create_ops(
        &self,
        ops: &mut OpVec,
        transform: &TruelightTransform,
        dir: TransformDirection,
    ) -> TlResult<()>;
}

/// Engine placeholder for deployments without Truelight support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl TruelightEngine for UnavailableEngine {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_ops(
        &self,
        _ops: &mut OpVec,
        _transform: &TruelightTransform,
        _dir: TransformDirection,
    ) -> TlResult<()> {
        Err(TlError::unsupported(
            self.name(),
            "built without a Truelight engine; set TRUELIGHT_ENGINE or install an engine on the config",
        ))
    }
}

/// Engine selection and limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Cube-baking program; `None` means no engine.
    pub program: Option<PathBuf>,
    /// Longest time a single engine call may take.
    pub timeout: Duration,
    /// Edge length of baked cubes.
    pub cube_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            program: None,
            timeout: Duration::from_secs(30),
            cube_size: 32,
        }
    }
}

impl EngineSettings {
    /// Reads settings from `TRUELIGHT_ENGINE`, `TRUELIGHT_TIMEOUT_MS` and
    /// `TRUELIGHT_CUBE_SIZE`, keeping defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(program) = lookup(ENV_ENGINE).filter(|p| !p.is_empty()) {
            settings.program = Some(PathBuf::from(program));
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => settings.timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT_MS),
            }
        }

        if let Some(raw) = lookup(ENV_CUBE_SIZE) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size >= 2 => settings.cube_size = size,
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_CUBE_SIZE),
            }
        }

        settings
    }

    /// Builds the engine these settings describe.
    pub fn into_engine(self) -> Arc<dyn TruelightEngine> {
        match self.program {
            Some(program) => Arc::new(
                CommandEngine::new(program)
                    .with_timeout(self.timeout)
                    .with_cube_size(self.cube_size),
            ),
            None => Arc::new(UnavailableEngine),
        }
    }
}
