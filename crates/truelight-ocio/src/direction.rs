//! Transform directions and how they compose.
//!
//! A transform carries its own direction, and the pipeline that embeds it
//! supplies an ambient one. The effective direction is their composition:
//! flips add up modulo 2.
//!
//! ```
//! use truelight_ocio::TransformDirection::{Forward, Inverse};
//!
//! assert_eq!(Inverse.combine(Forward), Inverse);
//! assert_eq!(Inverse.combine(Inverse), Forward);
//! ```

use std::fmt;

/// Transform application direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformDirection {
    /// Forward transform.
    #[default]
    Forward,
    /// Inverse transform.
    Inverse,
}

impl TransformDirection {
    /// Returns the opposite direction.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }

    /// Composes two directions: equal gives `Forward`, different gives `Inverse`.
    #[inline]
    pub fn combine(self, other: Self) -> Self {
        if self == other {
            Self::Forward
        } else {
            Self::Inverse
        }
    }

    /// Parses a direction keyword (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Some(Self::Forward),
            "inverse" => Some(Self::Inverse),
            _ => None,
        }
    }

    /// Returns the config keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Inverse => "inverse",
        }
    }
}

impl fmt::Display for TransformDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composes an ambient pipeline direction with a transform's own direction.
#[inline]
pub fn combine_directions(ambient: TransformDirection, own: TransformDirection) -> TransformDirection {
    ambient.combine(own)
}

/// Which side of a color space a transform is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpaceDirection {
    /// Converts from the color space into the reference space.
    ToReference,
    /// Converts from the reference space into the color space.
    FromReference,
}

impl ColorSpaceDirection {
    /// Parses the config key (`to_reference` / `from_reference`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "to_reference" => Some(Self::ToReference),
            "from_reference" => Some(Self::FromReference),
            _ => None,
        }
    }

    /// Returns the config key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToReference => "to_reference",
            Self::FromReference => "from_reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransformDirection::{Forward, Inverse};

    const ALL: [TransformDirection; 2] = [Forward, Inverse];

    #[test]
    fn combine_table() {
        assert_eq!(combine_directions(Forward, Forward), Forward);
        assert_eq!(combine_directions(Forward, Inverse), Inverse);
        assert_eq!(combine_directions(Inverse, Forward), Inverse);
        assert_eq!(combine_directions(Inverse, Inverse), Forward);
    }

    #[test]
    fn combine_is_commutative_and_self_inverse() {
        for a in ALL {
            for b in ALL {
                assert_eq!(a.combine(b), b.combine(a));
                assert_eq!(a.combine(a.combine(b)), b);
            }
        }
    }

    #[test]
    fn inverse_matches_combining_with_inverse() {
        for d in ALL {
            assert_eq!(d.inverse(), d.combine(Inverse));
            assert_eq!(d.inverse().inverse(), d);
        }
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(TransformDirection::parse("Inverse"), Some(Inverse));
        assert_eq!(TransformDirection::parse("forward"), Some(Forward));
        assert_eq!(TransformDirection::parse("unknown"), None);
        assert_eq!(Inverse.to_string(), "inverse");

        assert_eq!(
            ColorSpaceDirection::parse("from_reference"),
            Some(ColorSpaceDirection::FromReference)
        );
        assert_eq!(ColorSpaceDirection::ToReference.as_str(), "to_reference");
    }
}
