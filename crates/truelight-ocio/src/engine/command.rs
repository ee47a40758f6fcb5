//! Engine that shells out to a Truelight cube-baking program.
//!
//! The program receives the descriptor as command-line flags and prints a
//! `.cube` 3D LUT on stdout:
//!
//! ```text
//! <program> --config-root /usr/fl/truelight --print internal-LowContrast \
//!           --display sRGB --cube-input log --cube-size 32 [--invert]
//! ```

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use super::TruelightEngine;
use super::cube::{MAX_CUBE_SIZE, parse_cube_3d};
use crate::direction::TransformDirection;
use crate::error::{TlError, TlResult};
use crate::op::OpVec;
use crate::truelight::{TruelightField, TruelightTransform};

/// Cube input modes the program understands.
pub const CUBE_INPUT_MODES: [&str; 3] = ["log", "linear", "video"];

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs an external program to bake each Truelight transform into a 3D LUT.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    base_args: Vec<String>,
    timeout: Duration,
    cube_size: usize,
}

impl CommandEngine {
    /// Creates an engine around `program` with a 30 s timeout and 32^3 cubes.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            timeout: Duration::from_secs(30),
            cube_size: 32,
        }
    }

    /// Arguments placed before the descriptor flags, e.g. a script for an
    /// interpreter.
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the baked cube size (clamped to `2..=MAX_CUBE_SIZE`).
    pub fn with_cube_size(mut self, size: usize) -> Self {
        self.cube_size = size.clamp(2, MAX_CUBE_SIZE);
        self
    }

    /// Program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Builds the argument list for one descriptor.
    pub fn args(&self, transform: &TruelightTransform, dir: TransformDirection) -> Vec<String> {
        let mut args = self.base_args.clone();
        for (field, value) in transform.fields() {
            if field == TruelightField::CubeInput {
                continue;
            }
            // The root is always passed so the program never guesses one.
            if value.is_empty() && field != TruelightField::ConfigRoot {
                continue;
            }
            args.push(format!("--{}", field.key().replace('_', "-")));
            args.push(value.to_string());
        }
        args.push("--cube-input".into());
        args.push(transform.cube_input().to_string());
        args.push("--cube-size".into());
        args.push(self.cube_size.to_string());
        if dir == TransformDirection::Inverse {
            args.push("--invert".into());
        }
        args
    }

    /// Locates the program: a path with a directory part is used as is, a
    /// bare name is looked up on `PATH`. Only executable files count.
    pub fn resolve_program(&self) -> Option<PathBuf> {
        if self.program.components().count() > 1 {
            return is_executable(&self.program).then(|| self.program.clone());
        }
        let path = env::var_os("PATH")?;
        env::split_paths(&path)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| is_executable(candidate))
    }

    fn check(&self, transform: &TruelightTransform) -> TlResult<()> {
        if !CUBE_INPUT_MODES.iter().any(|m| *m == transform.cube_input()) {
            return Err(TlError::invalid_config(format!(
                "unsupported cube input '{}' (expected one of: {})",
                transform.cube_input(),
                CUBE_INPUT_MODES.join(", ")
            )));
        }
        Ok(())
    }

    fn run(&self, args: &[String]) -> TlResult<String> {
        trace!(program = %self.program.display(), ?args, "spawning truelight engine");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TlError::unsupported(
                    self.name(),
                    format!("cannot start {}: {}", self.program.display(), e),
                )
            })?;

        // Drain both pipes so a large cube cannot stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child)?;
        let stdout = join(stdout);
        let stderr = join(stderr);

        if !status.success() {
            let detail = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(TlError::invalid_config(if detail.is_empty() {
                format!("engine exited with {}", status)
            } else {
                format!("engine exited with {}: {}", status, detail)
            }));
        }

        String::from_utf8(stdout)
            .map_err(|_| TlError::invalid_config("engine output is not valid UTF-8"))
    }

    fn wait(&self, child: &mut Child) -> TlResult<std::process::ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let polled = child.try_wait().map_err(|e| {
                TlError::unsupported(self.name(), format!("lost track of engine process: {}", e))
            })?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                // Best effort: the process may have exited between the poll and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(TlError::unsupported(
                    self.name(),
                    format!("engine timed out after {:?}", self.timeout),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

impl TruelightEngine for CommandEngine {
    fn name(&self) -> &str {
        "truelight-command"
    }

    fn is_available(&self) -> bool {
        self.resolve_program().is_some()
    }

    fn create_ops(
        &self,
        ops: &mut OpVec,
        transform: &TruelightTransform,
        dir: TransformDirection,
    ) -> TlResult<()> {
        self.check(transform)?;

        let args = self.args(transform, dir);
        let started = Instant::now();
        let text = self.run(&args)?;
        let op = parse_cube_3d(&text)?;

        info!(
            size = self.cube_size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            %dir,
            "baked truelight cube"
        );
        debug!(%transform, "engine accepted transform");

        ops.push(op);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_field_order() {
        let mut tl = TruelightTransform::new();
        tl.set_print("internal-LowContrast");
        tl.set_display("sRGB");

        let engine = CommandEngine::new("/nonexistent/tlcube").with_cube_size(17);
        assert_eq!(
            engine.args(&tl, TransformDirection::Inverse),
            [
                "--config-root", "/usr/fl/truelight",
                "--print", "internal-LowContrast",
                "--display", "sRGB",
                "--cube-input", "log",
                "--cube-size", "17",
                "--invert",
            ]
        );
    }

    #[test]
    fn base_args_come_first() {
        let engine = CommandEngine::new("/bin/sh").with_base_args(["bake.sh"]);
        let args = engine.args(&TruelightTransform::new(), TransformDirection::Forward);
        assert_eq!(args[0], "bake.sh");
        assert_eq!(args[1], "--config-root");
    }

    #[test]
    fn missing_program_is_unavailable() {
        let engine = CommandEngine::new("/nonexistent/tlcube");
        assert!(!engine.is_available());
    }

    #[cfg(unix)]
    #[test]
    fn bare_names_resolve_on_path() {
        let engine = CommandEngine::new("sh");
        assert!(engine.is_available());
        assert!(engine.resolve_program().is_some_and(|p| p.is_absolute()));

        assert!(!CommandEngine::new("no-such-truelight-baker").is_available());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("tlcube");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!CommandEngine::new(&script).is_available());

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(CommandEngine::new(&script).is_available());
        assert!(!CommandEngine::new(dir.path()).is_available());
    }

    #[test]
    fn unknown_cube_input_rejected_before_spawn() {
        let mut tl = TruelightTransform::new();
        tl.set_cube_input("Gamma");

        let engine = CommandEngine::new("/nonexistent/tlcube");
        let mut ops = OpVec::new();
        let err = engine
            .create_ops(&mut ops, &tl, TransformDirection::Forward)
            .unwrap_err();
        assert!(matches!(err, TlError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("gamma"));
        assert!(ops.is_empty());
    }

    #[test]
    fn cube_size_is_clamped() {
        let engine = CommandEngine::new("x").with_cube_size(0);
        let args = engine.args(&TruelightTransform::new(), TransformDirection::Forward);
        let pos = args.iter().position(|a| a == "--cube-size").unwrap();
        assert_eq!(args[pos + 1], "2");

        let engine = CommandEngine::new("x").with_cube_size(100_000);
        let args = engine.args(&TruelightTransform::new(), TransformDirection::Forward);
        assert_eq!(args[pos + 1], MAX_CUBE_SIZE.to_string());
    }
}
