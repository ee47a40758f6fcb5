//! Truelight transform descriptor.
//!
//! A `TruelightTransform` records the configuration handed to the Truelight
//! engine: where its profiles live, which profile or device chain to use, and
//! how cube input values are encoded. It holds no engine state; the engine
//! only sees it when ops are built.
//!
//! # Example
//!
//! ```
//! use truelight_ocio::{TruelightTransform, TransformDirection};
//!
//! let mut tl = TruelightTransform::new();
//! tl.set_print("internal-LowContrast");
//! tl.set_display("sRGB");
//! tl.set_cube_input("LOG");
//!
//! assert_eq!(tl.cube_input(), "log");
//! assert_eq!(tl.direction(), TransformDirection::Forward);
//!
//! // Edits to a copy never reach the original.
//! let mut copy = tl.editable_copy();
//! copy.set_display("DCIrgb");
//! assert_eq!(tl.display(), "sRGB");
//! ```

use std::fmt;

use crate::direction::TransformDirection;

/// Config root used when none is given.
pub const DEFAULT_CONFIG_ROOT: &str = "/usr/fl/truelight";

/// Cube input mode used when none is given.
pub const DEFAULT_CUBE_INPUT: &str = "log";

/// Fields recognized on a Truelight transform, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruelightField {
    /// Truelight installation / profile root.
    ConfigRoot,
    /// Profile identifier.
    Profile,
    /// Camera identifier.
    Camera,
    /// Input display identifier.
    InputDisplay,
    /// Film recorder identifier.
    Recorder,
    /// Print stock identifier.
    Print,
    /// Projection lamp identifier.
    Lamp,
    /// Output camera identifier.
    OutputCamera,
    /// Display identifier.
    Display,
    /// Cube input encoding (`log`, `linear`, `video`).
    CubeInput,
}

impl TruelightField {
    /// Number of recognized fields.
    pub const COUNT: usize = 10;

    /// All fields in serialization order.
    pub const ALL: [TruelightField; Self::COUNT] = [
        Self::ConfigRoot,
        Self::Profile,
        Self::Camera,
        Self::InputDisplay,
        Self::Recorder,
        Self::Print,
        Self::Lamp,
        Self::OutputCamera,
        Self::Display,
        Self::CubeInput,
    ];

    /// Returns the serialized key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ConfigRoot => "config_root",
            Self::Profile => "profile",
            Self::Camera => "camera",
            Self::InputDisplay => "input_display",
            Self::Recorder => "recorder",
            Self::Print => "print",
            Self::Lamp => "lamp",
            Self::OutputCamera => "output_camera",
            Self::Display => "display",
            Self::CubeInput => "cube_input",
        }
    }

    /// Looks a field up by its serialized key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Value a fresh transform starts with.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::ConfigRoot => DEFAULT_CONFIG_ROOT,
            Self::CubeInput => DEFAULT_CUBE_INPUT,
            _ => "",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Truelight transform descriptor.
///
/// Value type: cloning (or [`editable_copy`](Self::editable_copy)) yields a
/// fully independent descriptor. Besides its value, each field remembers
/// whether it was ever set explicitly; serialization writes exactly those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruelightTransform {
    direction: TransformDirection,
    values: [String; TruelightField::COUNT],
    explicit: [bool; TruelightField::COUNT],
}

impl Default for TruelightTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl TruelightTransform {
    /// Creates a descriptor with default field values.
    pub fn new() -> Self {
        Self {
            direction: TransformDirection::Forward,
            values: TruelightField::ALL.map(|f| f.default_value().to_string()),
            explicit: [false; TruelightField::COUNT],
        }
    }

    /// Returns an independent copy that can be edited freely.
    pub fn editable_copy(&self) -> Self {
        self.clone()
    }

    /// Overwrites every field and the direction from `other`.
    pub fn assign(&mut self, other: &Self) {
        self.direction = other.direction;
        self.values.clone_from(&other.values);
        self.explicit = other.explicit;
    }

    /// Returns the transform's own direction.
    #[inline]
    pub fn direction(&self) -> TransformDirection {
        self.direction
    }

    /// Sets the transform's own direction.
    #[inline]
    pub fn set_direction(&mut self, direction: TransformDirection) {
        self.direction = direction;
    }

    /// Returns a field value.
    #[inline]
    pub fn field(&self, field: TruelightField) -> &str {
        &self.values[field.index()]
    }

    /// Sets a field value. Cube input is stored lowercased.
    pub fn set_field(&mut self, field: TruelightField, value: impl Into<String>) {
        let value = value.into();
        self.values[field.index()] = match field {
            TruelightField::CubeInput => value.to_lowercase(),
            _ => value,
        };
        self.explicit[field.index()] = true;
    }

    /// Checks whether a field was set through a setter (or decoded), even if
    /// to its default value.
    #[inline]
    pub fn is_set(&self, field: TruelightField) -> bool {
        self.explicit[field.index()]
    }

    /// Checks whether a field still holds its construction-time value.
    pub fn is_default_field(&self, field: TruelightField) -> bool {
        self.field(field) == field.default_value()
    }

    /// Iterates `(field, value)` pairs in serialization order.
    pub fn fields(&self) -> impl Iterator<Item = (TruelightField, &str)> {
        TruelightField::ALL.into_iter().map(move |f| (f, self.field(f)))
    }

    /// Returns the config root.
    pub fn config_root(&self) -> &str {
        self.field(TruelightField::ConfigRoot)
    }

    /// Sets the config root.
    pub fn set_config_root(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::ConfigRoot, value);
    }

    /// Returns the profile.
    pub fn profile(&self) -> &str {
        self.field(TruelightField::Profile)
    }

    /// Sets the profile.
    pub fn set_profile(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Profile, value);
    }

    /// Returns the camera.
    pub fn camera(&self) -> &str {
        self.field(TruelightField::Camera)
    }

    /// Sets the camera.
    pub fn set_camera(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Camera, value);
    }

    /// Returns the input display.
    pub fn input_display(&self) -> &str {
        self.field(TruelightField::InputDisplay)
    }

    /// Sets the input display.
    pub fn set_input_display(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::InputDisplay, value);
    }

    /// Returns the recorder.
    pub fn recorder(&self) -> &str {
        self.field(TruelightField::Recorder)
    }

    /// Sets the recorder.
    pub fn set_recorder(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Recorder, value);
    }

    /// Returns the print.
    pub fn print(&self) -> &str {
        self.field(TruelightField::Print)
    }

    /// Sets the print.
    pub fn set_print(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Print, value);
    }

    /// Returns the lamp.
    pub fn lamp(&self) -> &str {
        self.field(TruelightField::Lamp)
    }

    /// Sets the lamp.
    pub fn set_lamp(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Lamp, value);
    }

    /// Returns the output camera.
    pub fn output_camera(&self) -> &str {
        self.field(TruelightField::OutputCamera)
    }

    /// Sets the output camera.
    pub fn set_output_camera(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::OutputCamera, value);
    }

    /// Returns the display.
    pub fn display(&self) -> &str {
        self.field(TruelightField::Display)
    }

    /// Sets the display.
    pub fn set_display(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::Display, value);
    }

    /// Returns the cube input mode (always lowercase).
    pub fn cube_input(&self) -> &str {
        self.field(TruelightField::CubeInput)
    }

    /// Sets the cube input mode.
    pub fn set_cube_input(&mut self, value: impl Into<String>) {
        self.set_field(TruelightField::CubeInput, value);
    }
}

impl fmt::Display for TruelightTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TruelightTransform direction={}", self.direction)?;
        for (field, value) in self.fields().filter(|(_, v)| !v.is_empty()) {
            write!(f, ", {}={}", field.key(), value.escape_debug())?;
        }
        f.write_str(">")
    }
}
