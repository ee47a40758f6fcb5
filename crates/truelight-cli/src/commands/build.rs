//! Build command: expand a Truelight transform into ops.

use crate::BuildArgs;
use anyhow::{Context, Result, anyhow};
use std::time::Duration;
use tracing::{debug, info};
use truelight_ocio::codec;
use truelight_ocio::engine::EngineSettings;
use truelight_ocio::{
    Config, OpVec, Processor, ProcessorOp, TransformDirection, TruelightField, TruelightTransform,
    build_truelight_ops,
};

pub fn run(args: BuildArgs, verbose: u8) -> Result<()> {
    let transform = descriptor(&args)?;
    let ambient = TransformDirection::parse(&args.ambient)
        .ok_or_else(|| anyhow!("unknown direction '{}'", args.ambient))?;

    let settings = settings(&args);
    debug!(?settings, "engine settings");
    let config = Config::new().with_engine(settings.into_engine());

    if verbose > 0 {
        println!("{}", transform);
        println!("ambient direction: {}", ambient);
    }

    let mut ops = OpVec::new();
    build_truelight_ops(&mut ops, &config, &transform, ambient)
        .with_context(|| format!("engine '{}' could not build the transform", config.engine().name()))?;
    info!(ops = ops.len(), "built truelight ops");

    for (i, op) in ops.iter().enumerate() {
        println!("{:>3}: {}", i, summary(op));
    }

    if let Some(apply) = &args.apply {
        let mut px = [super::parse_rgb(apply)?];
        let processor = Processor::from_ops(ops);
        processor.apply_rgb(&mut px);
        println!("{} -> {:.6},{:.6},{:.6}", apply, px[0][0], px[0][1], px[0][2]);
    }

    Ok(())
}

/// Descriptor from `--from` with individual flags layered on top.
fn descriptor(args: &BuildArgs) -> Result<TruelightTransform> {
    let mut tl = match &args.from {
        Some(block) => codec::decode_truelight(block).context("--from is not a TruelightTransform block")?,
        None => TruelightTransform::new(),
    };

    let flags = [
        (TruelightField::ConfigRoot, &args.config_root),
        (TruelightField::Profile, &args.profile),
        (TruelightField::Camera, &args.camera),
        (TruelightField::InputDisplay, &args.input_display),
        (TruelightField::Recorder, &args.recorder),
        (TruelightField::Print, &args.print),
        (TruelightField::Lamp, &args.lamp),
        (TruelightField::OutputCamera, &args.output_camera),
        (TruelightField::Display, &args.display),
        (TruelightField::CubeInput, &args.cube_input),
    ];
    for (field, value) in flags {
        if let Some(value) = value {
            tl.set_field(field, value.as_str());
        }
    }
    if args.inverse {
        tl.set_direction(TransformDirection::Inverse);
    }
    Ok(tl)
}

/// Environment settings with command-line overrides.
fn settings(args: &BuildArgs) -> EngineSettings {
    let mut settings = EngineSettings::from_env();
    if let Some(program) = &args.engine {
        settings.program = Some(program.clone());
    }
    if let Some(ms) = args.timeout_ms {
        settings.timeout = Duration::from_millis(ms);
    }
    if let Some(size) = args.cube_size {
        settings.cube_size = size;
    }
    settings
}

fn summary(op: &ProcessorOp) -> String {
    match op {
        ProcessorOp::Matrix { offset, .. } => {
            format!("{} (identity: {}, offset {:?})", op.kind(), op.is_identity(), offset)
        }
        ProcessorOp::Lut3d { size, domain_min, domain_max, .. } => {
            format!("{} {}^3 domain {:?}..{:?}", op.kind(), size, domain_min, domain_max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: BuildArgs,
    }

    fn parse(argv: &[&str]) -> BuildArgs {
        Harness::parse_from(std::iter::once("tlx").chain(argv.iter().copied())).args
    }

    #[test]
    fn flags_override_block() {
        let args = parse(&[
            "--from",
            "!<TruelightTransform> {print: internal-LowContrast, display: sRGB}",
            "--display",
            "DCIrgb",
            "--cube-input",
            "Linear",
            "--inverse",
        ]);
        let tl = descriptor(&args).unwrap();
        assert_eq!(tl.print(), "internal-LowContrast");
        assert_eq!(tl.display(), "DCIrgb");
        assert_eq!(tl.cube_input(), "linear");
        assert_eq!(tl.direction(), TransformDirection::Inverse);
    }

    #[test]
    fn engine_flags_override_env() {
        let args = parse(&["--engine", "/opt/tl/bake", "--timeout-ms", "1500", "--cube-size", "17"]);
        let s = settings(&args);
        assert_eq!(s.program.as_deref(), Some(std::path::Path::new("/opt/tl/bake")));
        assert_eq!(s.timeout, Duration::from_millis(1500));
        assert_eq!(s.cube_size, 17);
    }

    #[test]
    fn rejects_matrix_block() {
        let args = parse(&["--from", "!<MatrixTransform> {}"]);
        assert!(descriptor(&args).is_err());
    }
}
