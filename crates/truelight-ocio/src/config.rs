//! Pipeline context: color spaces, roles, and the Truelight engine.
//!
//! # Example
//!
//! ```
//! use truelight_ocio::{Config, ColorSpace, ColorSpaceDirection, TlError, TruelightTransform};
//!
//! let mut config = Config::new();
//! config.add_colorspace(ColorSpace::new("log").with_family("log"));
//! config.set_role("compositing_log", "log");
//!
//! let mut tl = TruelightTransform::new();
//! tl.set_print("internal-LowContrast");
//! tl.set_display("sRGB");
//! config.add_colorspace(
//!     ColorSpace::new("sRGB").with_transform(tl.into(), ColorSpaceDirection::FromReference),
//! );
//!
//! // No engine installed: building fails instead of passing pixels through.
//! let err = config.processor("compositing_log", "sRGB").unwrap_err();
//! assert!(matches!(err, TlError::UnsupportedEngine { .. }));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::builder::build_ops;
use crate::colorspace::ColorSpace;
use crate::direction::{ColorSpaceDirection, TransformDirection};
use crate::engine::{TruelightEngine, UnavailableEngine};
use crate::error::{TlError, TlResult};
use crate::op::OpVec;
use crate::processor::Processor;

/// Color pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// All color spaces, in insertion order.
    colorspaces: Vec<ColorSpace>,
    /// Role name -> color space name.
    roles: HashMap<String, String>,
    /// Engine that realizes Truelight transforms.
    engine: Arc<dyn TruelightEngine>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates an empty configuration without a Truelight engine.
    pub fn new() -> Self {
        Self {
            colorspaces: Vec::new(),
            roles: HashMap::new(),
            engine: Arc::new(UnavailableEngine),
        }
    }

    /// Replaces the engine.
    pub fn with_engine(mut self, engine: Arc<dyn TruelightEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the engine in place.
    pub fn set_engine(&mut self, engine: Arc<dyn TruelightEngine>) {
        self.engine = engine;
    }

    /// Returns the engine.
    #[inline]
    pub fn engine(&self) -> &dyn TruelightEngine {
        self.engine.as_ref()
    }

    /// Adds a color space, replacing one with the same name.
    pub fn add_colorspace(&mut self, cs: ColorSpace) {
        match self.colorspaces.iter_mut().find(|c| c.name() == cs.name()) {
            Some(existing) => *existing = cs,
            None => self.colorspaces.push(cs),
        }
    }

    /// Maps a role to a color space name.
    pub fn set_role(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.roles.insert(role.into(), colorspace.into());
    }

    /// Returns the color space a role maps to.
    pub fn role(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(String::as_str)
    }

    /// Looks up a color space by name, then by role.
    pub fn colorspace(&self, name: &str) -> Option<&ColorSpace> {
        self.colorspaces
            .iter()
            .find(|cs| cs.name() == name)
            .or_else(|| {
                let target = self.role(name)?;
                self.colorspaces.iter().find(|cs| cs.name() == target)
            })
    }

    /// Returns all color spaces.
    #[inline]
    pub fn colorspaces(&self) -> &[ColorSpace] {
        &self.colorspaces
    }

    /// Iterates color space names.
    pub fn colorspace_names(&self) -> impl Iterator<Item = &str> {
        self.colorspaces.iter().map(|cs| cs.name())
    }

    /// Creates a processor converting `src` to `dst` through the reference space.
    pub fn processor(&self, src: &str, dst: &str) -> TlResult<Processor> {
        let src_cs = self
            .colorspace(src)
            .ok_or_else(|| TlError::ColorSpaceNotFound { name: src.into() })?;
        let dst_cs = self
            .colorspace(dst)
            .ok_or_else(|| TlError::ColorSpaceNotFound { name: dst.into() })?;

        let mut ops = OpVec::new();
        if src_cs.name() == dst_cs.name() {
            return Ok(Processor::from_ops(ops));
        }

        // Source to reference
        if let Some(t) = src_cs.transform(ColorSpaceDirection::ToReference) {
            build_ops(&mut ops, self, t, TransformDirection::Forward)?;
        } else if let Some(t) = src_cs.transform(ColorSpaceDirection::FromReference) {
            build_ops(&mut ops, self, t, TransformDirection::Inverse)?;
        }

        // Reference to destination
        if let Some(t) = dst_cs.transform(ColorSpaceDirection::FromReference) {
            build_ops(&mut ops, self, t, TransformDirection::Forward)?;
        } else if let Some(t) = dst_cs.transform(ColorSpaceDirection::ToReference) {
            build_ops(&mut ops, self, t, TransformDirection::Inverse)?;
        }

        debug!(src = src_cs.name(), dst = dst_cs.name(), ops = ops.len(), "assembled processor");
        Ok(Processor::from_ops(ops))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{MatrixTransform, Transform};

    fn config() -> Config {
        let mut config = Config::new();
        config.add_colorspace(ColorSpace::new("lin").with_family("scene"));
        config.add_colorspace(
            ColorSpace::new("half")
                .with_transform(MatrixTransform::scale(0.5).into(), ColorSpaceDirection::FromReference),
        );
        config.add_colorspace(
            ColorSpace::new("double")
                .with_transform(MatrixTransform::scale(0.5).into(), ColorSpaceDirection::ToReference),
        );
        config.set_role("scene_linear", "lin");
        config
    }

    #[test]
    fn roles_resolve() {
        let config = config();
        assert_eq!(config.colorspace("scene_linear").unwrap().name(), "lin");
        assert!(config.colorspace("nope").is_none());
    }

    #[test]
    fn add_replaces_same_name() {
        let mut config = config();
        config.add_colorspace(ColorSpace::new("lin").with_family("other"));
        assert_eq!(config.colorspaces().len(), 3);
        assert_eq!(config.colorspace("lin").unwrap().family(), "other");
    }

    #[test]
    fn missing_side_uses_inverse() {
        let config = config();

        let mut px = [[1.0_f32, 1.0, 1.0]];
        config.processor("lin", "half").unwrap().apply_rgb(&mut px);
        assert_eq!(px[0], [0.5, 0.5, 0.5]);

        // "double" only has to_reference (x0.5), so reaching it from the
        // reference runs it inverted (x2).
        let mut px = [[1.0_f32, 1.0, 1.0]];
        config.processor("lin", "double").unwrap().apply_rgb(&mut px);
        assert_eq!(px[0], [2.0, 2.0, 2.0]);

        let p = config.processor("half", "double").unwrap();
        assert_eq!(p.num_ops(), 2);
    }

    #[test]
    fn same_space_is_empty() {
        let config = config();
        assert!(config.processor("scene_linear", "lin").unwrap().is_empty());
    }

    #[test]
    fn unknown_space() {
        let config = config();
        let err = config.processor("lin", "ACEScg").unwrap_err();
        assert!(matches!(err, TlError::ColorSpaceNotFound { name } if name == "ACEScg"));
    }

    #[test]
    fn matrix_transform_in_colorspace_keeps_own_direction() {
        let mut config = Config::new();
        config.add_colorspace(ColorSpace::new("a"));
        let t = Transform::from(MatrixTransform::scale(4.0)).inverse();
        config.add_colorspace(ColorSpace::new("b").with_transform(t, ColorSpaceDirection::FromReference));

        let mut px = [[1.0_f32, 1.0, 1.0]];
        config.processor("a", "b").unwrap().apply_rgb(&mut px);
        assert_eq!(px[0], [0.25, 0.25, 0.25]);
    }
}
