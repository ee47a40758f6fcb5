//! CLI command implementations

pub mod build;
pub mod inspect;

use anyhow::{Context, Result, bail};

/// Splits text into serialized blocks.
///
/// A block starts at a line beginning with `!<` and runs until the next one.
/// Blank lines and `#` comments between blocks are skipped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match blocks.last_mut() {
            Some(current) if !trimmed.starts_with("!<") => {
                current.push(' ');
                current.push_str(trimmed);
            }
            _ => blocks.push(trimmed.to_string()),
        }
    }
    blocks
}

/// Parses `r,g,b` into a pixel.
pub fn parse_rgb(text: &str) -> Result<[f32; 3]> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected r,g,b but got '{}'", text);
    }
    let mut rgb = [0.0f32; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid channel value '{}'", part))?;
    }
    Ok(rgb)
}
