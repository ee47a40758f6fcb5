//! Parsing of the `.cube` text an engine prints.
//!
//! ```text
//! # Comment
//! TITLE "name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! ```

use crate::error::{TlError, TlResult};
use crate::op::ProcessorOp;

/// Largest cube edge accepted from an engine.
pub const MAX_CUBE_SIZE: usize = 256;

/// Parses a 3D `.cube` into a [`ProcessorOp::Lut3d`].
///
/// Parse failures are reported as [`TlError::InvalidConfiguration`], since the
/// text comes from the engine's answer to a descriptor.
pub fn parse_cube_3d(text: &str) -> TlResult<ProcessorOp> {
    let mut size: Option<usize> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut values: Vec<[f32; 3]> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
            continue;
        }

        if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
            size = Some(
                rest.trim()
                    .parse()
                    .map_err(|_| bad_cube(format!("invalid size line: {}", line)))?,
            );
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(bad_cube("expected 3D LUT, found 1D"));
        } else if let Some(rest) = line.strip_prefix("DOMAIN_MIN") {
            domain_min = parse_triplet(rest)?;
        } else if let Some(rest) = line.strip_prefix("DOMAIN_MAX") {
            domain_max = parse_triplet(rest)?;
        } else {
            values.push(parse_triplet(line)?);
        }
    }

    let size = size.ok_or_else(|| bad_cube("missing LUT_3D_SIZE"))?;
    if size < 2 {
        return Err(bad_cube(format!("cube size {} is too small", size)));
    }
    if size > MAX_CUBE_SIZE {
        return Err(bad_cube(format!(
            "cube size {} exceeds the limit of {}",
            size, MAX_CUBE_SIZE
        )));
    }
    let expected = size
        .checked_mul(size)
        .and_then(|n| n.checked_mul(size))
        .ok_or_else(|| bad_cube(format!("cube size {} overflows", size)))?;
    if values.len() != expected {
        return Err(bad_cube(format!(
            "expected {} values, found {}",
            expected,
            values.len()
        )));
    }

    // File order is red-fastest; stored order is blue-fastest.
    let mut data = vec![[0.0f32; 3]; expected];
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                data[b + g * size + r * size * size] = values[r + g * size + b * size * size];
            }
        }
    }

    Ok(ProcessorOp::Lut3d {
        data,
        size,
        domain_min,
        domain_max,
    })
}

fn parse_triplet(s: &str) -> TlResult<[f32; 3]> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(bad_cube(format!("expected 3 values: {}", s.trim())));
    }
    let mut out = [0.0f32; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| bad_cube(format!("invalid number: {}", part)))?;
    }
    Ok(out)
}

fn bad_cube(reason: impl std::fmt::Display) -> TlError {
    TlError::invalid_config(format!("engine returned an unreadable cube: {}", reason))
}
