//! Inspect command: decode blocks, show them, re-encode them.

use crate::InspectArgs;
use anyhow::{Context, Result, bail};
use std::fs;
use tracing::{debug, info};
use truelight_ocio::Transform;
use truelight_ocio::codec;

pub fn run(args: InspectArgs, verbose: u8) -> Result<()> {
    let mut blocks = args.blocks.clone();
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        blocks.extend(super::split_blocks(&text));
    }
    if blocks.is_empty() {
        bail!("no blocks given (pass them as arguments or with --file)");
    }
    info!(count = blocks.len(), "inspecting blocks");

    let mut mismatches = 0usize;
    for (i, block) in blocks.iter().enumerate() {
        let transform =
            codec::decode(block).with_context(|| format!("block {} is malformed", i + 1))?;
        let encoded = codec::encode(&transform);
        let same = encoded == block.trim();
        debug!(index = i, same, "re-encoded block");

        describe(&transform, verbose);
        println!("  {}", encoded);
        if args.check && !same {
            println!("  differs from input: {}", block.trim());
            mismatches += 1;
        }
        if i + 1 < blocks.len() {
            println!();
        }
    }

    if mismatches > 0 {
        bail!("{} block(s) did not re-encode to the same text", mismatches);
    }
    Ok(())
}

fn describe(transform: &Transform, verbose: u8) {
    match transform {
        Transform::Truelight(tl) => {
            println!("{}", tl);
            if verbose > 0 {
                for (field, value) in tl.fields() {
                    let mark = if tl.is_set(field) { "*" } else { " " };
                    println!("  {} {:<14} {}", mark, field.key(), value);
                }
            }
        }
        Transform::Matrix(m) => {
            println!("<MatrixTransform direction={}>", m.direction);
            if verbose > 0 {
                for row in m.matrix.chunks(4) {
                    println!("    {:?}", row);
                }
                println!("    offset {:?}", m.offset);
            }
        }
    }
}
