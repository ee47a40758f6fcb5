//! Serialized form of transforms inside a pipeline config.
//!
//! Transforms are written as YAML flow mappings with a verbatim tag:
//!
//! ```text
//! !<TruelightTransform> {config_root: /usr/fl/truelight, print: internal-LowContrast, display: sRGB, cube_input: log}
//! !<MatrixTransform> {matrix: [2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1], direction: inverse}
//! ```
//!
//! Only fields that were explicitly set are written, in a fixed order, with
//! `direction` last and only when it is `inverse`. Decoding rejects unknown
//! keys. Re-encoding a decoded canonical block reproduces it byte for byte.
//!
//! # Example
//!
//! ```
//! use truelight_ocio::codec;
//!
//! let block = "!<TruelightTransform> {config_root: /usr/fl/truelight, print: internal-LowContrast, display: sRGB, cube_input: log}";
//! let tl = codec::decode_truelight(block).unwrap();
//! assert_eq!(tl.print(), "internal-LowContrast");
//! assert_eq!(codec::encode_truelight(&tl), block);
//! ```

use std::borrow::Cow;
use std::fmt::Write;

use serde::Deserialize;

use crate::direction::TransformDirection;
use crate::error::{TlError, TlResult};
use crate::transform::{MatrixTransform, Transform};
use crate::truelight::{TruelightField, TruelightTransform};

/// Tag of serialized Truelight transforms.
pub const TRUELIGHT_TAG: &str = "TruelightTransform";

/// Tag of serialized matrix transforms.
pub const MATRIX_TAG: &str = "MatrixTransform";

/// Encodes any supported transform.
pub fn encode(transform: &Transform) -> String {
    match transform {
        Transform::Truelight(t) => encode_truelight(t),
        Transform::Matrix(t) => encode_matrix(t),
    }
}

/// Decodes any supported transform, dispatching on the tag.
pub fn decode(block: &str) -> TlResult<Transform> {
    let (tag, _) = split_tag(block)?;
    match tag {
        TRUELIGHT_TAG => decode_truelight(block).map(Transform::Truelight),
        MATRIX_TAG => decode_matrix(block).map(Transform::Matrix),
        other => Err(TlError::malformed(format!("unknown transform type '{}'", other))),
    }
}

/// Encodes a Truelight transform.
pub fn encode_truelight(t: &TruelightTransform) -> String {
    let mut entries: Vec<(&str, Cow<'_, str>)> = t
        .fields()
        .filter(|(field, _)| t.is_set(*field))
        .map(|(field, value)| (field.key(), scalar(value)))
        .collect();
    if t.direction() == TransformDirection::Inverse {
        entries.push(("direction", Cow::Borrowed(t.direction().as_str())));
    }
    flow_block(TRUELIGHT_TAG, &entries)
}

/// Decodes a Truelight transform.
pub fn decode_truelight(block: &str) -> TlResult<TruelightTransform> {
    let raw: RawTruelight = parse_body(block, TRUELIGHT_TAG)?;

    let mut t = TruelightTransform::new();
    let values = [
        (TruelightField::ConfigRoot, raw.config_root),
        (TruelightField::Profile, raw.profile),
        (TruelightField::Camera, raw.camera),
        (TruelightField::InputDisplay, raw.input_display),
        (TruelightField::Recorder, raw.recorder),
        (TruelightField::Print, raw.print),
        (TruelightField::Lamp, raw.lamp),
        (TruelightField::OutputCamera, raw.output_camera),
        (TruelightField::Display, raw.display),
        (TruelightField::CubeInput, raw.cube_input),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            t.set_field(field, value);
        }
    }
    if let Some(dir) = raw.direction {
        t.set_direction(parse_direction(&dir)?);
    }
    Ok(t)
}

/// Encodes a matrix transform.
pub fn encode_matrix(t: &MatrixTransform) -> String {
    let mut entries: Vec<(&str, Cow<'_, str>)> = Vec::new();
    if !t.is_identity_matrix() {
        entries.push(("matrix", Cow::Owned(number_list(&t.matrix))));
    }
    if !t.is_zero_offset() {
        entries.push(("offset", Cow::Owned(number_list(&t.offset))));
    }
    if t.direction == TransformDirection::Inverse {
        entries.push(("direction", Cow::Borrowed(t.direction.as_str())));
    }
    flow_block(MATRIX_TAG, &entries)
}

/// Decodes a matrix transform.
pub fn decode_matrix(block: &str) -> TlResult<MatrixTransform> {
    let raw: RawMatrix = parse_body(block, MATRIX_TAG)?;

    let mut t = MatrixTransform::default();
    if let Some(m) = raw.matrix {
        t.matrix = m
            .try_into()
            .map_err(|m: Vec<f64>| TlError::malformed(format!("matrix needs 16 values, got {}", m.len())))?;
    }
    if let Some(o) = raw.offset {
        t.offset = o
            .try_into()
            .map_err(|o: Vec<f64>| TlError::malformed(format!("offset needs 4 values, got {}", o.len())))?;
    }
    if let Some(dir) = raw.direction {
        t.direction = parse_direction(&dir)?;
    }
    Ok(t)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTruelight {
    config_root: Option<String>,
    profile: Option<String>,
    camera: Option<String>,
    input_display: Option<String>,
    recorder: Option<String>,
    print: Option<String>,
    lamp: Option<String>,
    output_camera: Option<String>,
    display: Option<String>,
    cube_input: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMatrix {
    matrix: Option<Vec<f64>>,
    offset: Option<Vec<f64>>,
    direction: Option<String>,
}

/// Splits `!<Tag> {body}` into tag and body.
fn split_tag(block: &str) -> TlResult<(&str, &str)> {
    let block = block.trim();
    let rest = block
        .strip_prefix("!<")
        .ok_or_else(|| TlError::malformed("missing !<Type> tag"))?;
    let end = rest
        .find('>')
        .ok_or_else(|| TlError::malformed("unterminated !<Type> tag"))?;
    Ok((&rest[..end], rest[end + 1..].trim()))
}

fn parse_body<T: for<'de> Deserialize<'de>>(block: &str, expected_tag: &str) -> TlResult<T> {
    let (tag, body) = split_tag(block)?;
    if tag != expected_tag {
        return Err(TlError::malformed(format!(
            "expected !<{}>, found !<{}>",
            expected_tag, tag
        )));
    }
    if !(body.starts_with('{') && body.ends_with('}')) {
        return Err(TlError::malformed(format!("{} body must be a {{...}} mapping", tag)));
    }
    serde_yaml::from_str(body).map_err(|e| TlError::malformed(format!("{}: {}", tag, e)))
}

fn parse_direction(s: &str) -> TlResult<TransformDirection> {
    TransformDirection::parse(s)
        .ok_or_else(|| TlError::malformed(format!("invalid direction '{}'", s)))
}

fn flow_block(tag: &str, entries: &[(&str, Cow<'_, str>)]) -> String {
    let mut out = format!("!<{}> {{", tag);
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", key, value);
    }
    out.push('}');
    out
}

fn number_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Renders a string value: plain when YAML reads it back as the same string,
/// double-quoted otherwise.
fn scalar(value: &str) -> Cow<'_, str> {
    if is_plain(value) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => {
                let code = c as u32;
                if code <= 0xff {
                    let _ = write!(out, "\\x{:02X}", code);
                } else {
                    let _ = write!(out, "\\u{:04X}", code);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Characters YAML would reject or fold inside a double-quoted scalar.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
}

fn is_plain(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if !(first.is_ascii_alphanumeric() || matches!(first, '/' | '.' | '_')) {
        return false;
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | '@'))
    {
        return false;
    }
    // Scalars YAML would resolve to something other than a string.
    let lower = value.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null" | "~"
    ) {
        return false;
    }
    if value.parse::<f64>().is_ok() || lower.starts_with("0x") || lower.starts_with("0o") {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "!<TruelightTransform> {config_root: /usr/fl/truelight, print: internal-LowContrast, display: sRGB, cube_input: log}";

    #[test]
    fn encodes_set_fields_in_order() {
        let mut tl = TruelightTransform::new();
        tl.set_display("sRGB");
        tl.set_cube_input("log");
        tl.set_print("internal-LowContrast");
        tl.set_config_root("/usr/fl/truelight");
        assert_eq!(encode_truelight(&tl), SIMPLE);
    }

    #[test]
    fn untouched_defaults_are_not_written() {
        let mut tl = TruelightTransform::new();
        tl.set_print("kodak2383");
        tl.set_direction(TransformDirection::Inverse);
        assert_eq!(
            encode_truelight(&tl),
            "!<TruelightTransform> {print: kodak2383, direction: inverse}"
        );
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let blocks = [
            SIMPLE,
            "!<TruelightTransform> {config_root: /usr/fl/truelight, profile: film.profile, camera: arri-alexa, input_display: DCIrgb, recorder: arrilaser, print: kodak2383, lamp: xenon, output_camera: red, display: sRGB, cube_input: video, direction: inverse}",
            "!<TruelightTransform> {profile: \"my profile, v2\", cube_input: linear}",
            "!<TruelightTransform> {config_root: \"true\", display: \"2.4\"}",
            "!<TruelightTransform> {}",
            "!<MatrixTransform> {}",
            "!<MatrixTransform> {matrix: [2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1], offset: [0.1, -0.25, 0, 0], direction: inverse}",
        ];
        for block in blocks {
            let t = decode(block).unwrap();
            assert_eq!(encode(&t), block);
        }
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let t = decode_truelight("!<TruelightTransform> {}").unwrap();
        assert_eq!(t, TruelightTransform::new());
        assert_eq!(t.config_root(), "/usr/fl/truelight");
        assert_eq!(t.cube_input(), "log");

        let mut tl = TruelightTransform::new();
        tl.set_config_root("");
        assert_eq!(encode_truelight(&tl), r#"!<TruelightTransform> {config_root: ""}"#);
        assert_eq!(decode_truelight(&encode_truelight(&tl)).unwrap(), tl);
    }

    #[test]
    fn special_values_are_quoted() {
        let mut tl = TruelightTransform::new();
        tl.set_profile("a \"quoted\" {value}");
        tl.set_camera("null");
        tl.set_lamp("-lamp");
        let block = encode_truelight(&tl);
        assert!(block.contains(r#"profile: "a \"quoted\" {value}""#));
        assert!(block.contains(r#"camera: "null""#));
        assert!(block.contains(r#"lamp: "-lamp""#));

        let back = decode_truelight(&block).unwrap();
        assert_eq!(back, tl);
    }

    #[test]
    fn cube_input_normalized_on_decode() {
        let t = decode_truelight("!<TruelightTransform> {cube_input: LOG}").unwrap();
        assert_eq!(t.cube_input(), "log");
    }

    #[test]
    fn control_and_non_ascii_values_survive() {
        let values = [
            "a\rb",
            "a\u{1}b",
            "del\u{7f}",
            "nel\u{85}",
            "crlf\r\n",
            "line\u{2028}sep",
            "bom\u{feff}",
            "caf\u{e9} \u{65e5}\u{672c}",
            "\u{1b}[0m",
            "tab\tend\0",
        ];
        for (i, field) in TruelightField::ALL.into_iter().enumerate() {
            let mut tl = TruelightTransform::new();
            tl.set_field(field, values[i]);
            let block = encode_truelight(&tl);

            assert!(!block.chars().any(needs_escape), "{:?}: {:?}", field, block);
            let back = decode_truelight(&block).unwrap();
            assert_eq!(back, tl, "{:?}: {:?}", field, block);
            assert_eq!(encode_truelight(&back), block);
        }
    }

    #[test]
    fn escapes_use_yaml_forms() {
        let mut tl = TruelightTransform::new();
        tl.set_profile("a\rb\u{1}c\u{2029}");
        assert_eq!(
            encode_truelight(&tl),
            r#"!<TruelightTransform> {profile: "a\rb\x01c\u2029"}"#
        );
    }

    #[test]
    fn rejects_malformed_blocks() {
        let cases = [
            "{print: x}",
            "!<TruelightTransform {print: x}",
            "!<FooTransform> {print: x}",
            "!<TruelightTransform> {gamma: 2.2}",
            "!<TruelightTransform> {direction: sideways}",
            "!<TruelightTransform> {print: [unclosed}",
            "!<TruelightTransform> print: x",
            "!<MatrixTransform> {matrix: [1, 2, 3]}",
        ];
        for block in cases {
            let err = decode(block).unwrap_err();
            assert!(
                matches!(err, TlError::MalformedSerializedForm { .. }),
                "{}: {:?}",
                block,
                err
            );
        }
    }

    #[test]
    fn wrong_tag_for_typed_decoder() {
        let err = decode_truelight("!<MatrixTransform> {}").unwrap_err();
        assert!(err.to_string().contains("expected !<TruelightTransform>"));
    }
}
