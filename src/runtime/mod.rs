//! Invoking the R runtime
//!
//! Generated scripts are not executed by the generator. This module lets a
//! caller hand a script to `Rscript`, either to check that it parses or to
//! run it.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::ScriptError;
use crate::templates::r_string;

/// Finds the Rscript executable, checking common installation locations.
///
/// Checks in order:
/// 1. Direct `Rscript` command (if PATH is set correctly)
/// 2. `R_HOME/bin/Rscript`
/// 3. Platform-specific fallback locations
pub fn find_rscript() -> Option<PathBuf> {
    if let Ok(output) = Command::new(rscript_exe_name()).arg("--version").output() {
        if output.status.success() {
            return Some(PathBuf::from(rscript_exe_name()));
        }
    }

    if let Ok(r_home) = env::var("R_HOME") {
        let rscript_path = PathBuf::from(r_home).join("bin").join(rscript_exe_name());
        if rscript_path.exists() {
            return Some(rscript_path);
        }
    }

    #[cfg(target_os = "macos")]
    {
        let candidates = [
            "/opt/homebrew/bin/Rscript",
            "/usr/local/bin/Rscript",
            "/Library/Frameworks/R.framework/Resources/bin/Rscript",
        ];
        for candidate in &candidates {
            if PathBuf::from(candidate).exists() {
                return Some(PathBuf::from(candidate));
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = ["/usr/bin/Rscript", "/usr/local/bin/Rscript", "/opt/R/bin/Rscript"];
        for candidate in &candidates {
            if PathBuf::from(candidate).exists() {
                return Some(PathBuf::from(candidate));
            }
        }
    }

    None
}

#[inline]
fn rscript_exe_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "Rscript.exe"
    }
    #[cfg(not(target_os = "windows"))]
    {
        "Rscript"
    }
}

/// Exit status and captured output of one Rscript invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Handle on an Rscript executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRuntime {
    program: PathBuf,
}

impl RRuntime {
    /// Use a specific Rscript executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the first Rscript found by [`find_rscript`]
    pub fn locate() -> Result<Self, ScriptError> {
        find_rscript()
            .map(Self::new)
            .ok_or(ScriptError::RuntimeNotFound)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Parse `script` without evaluating it
    pub fn check_syntax(&self, script: impl AsRef<Path>) -> Result<RunOutcome, ScriptError> {
        let script = script.as_ref();
        let expression = format!(
            "invisible(parse(file = {}))",
            r_string(&script.to_string_lossy())
        );
        debug!(script = %script.display(), "checking R syntax");
        self.invoke(&["--vanilla", "-e", expression.as_str()])
    }

    /// Run `script`
    pub fn run(&self, script: impl AsRef<Path>) -> Result<RunOutcome, ScriptError> {
        let script = script.as_ref();
        info!(script = %script.display(), "running R script");
        let path = script.to_string_lossy();
        self.invoke(&["--vanilla", &*path])
    }

    fn invoke(&self, args: &[&str]) -> Result<RunOutcome, ScriptError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| ScriptError::Runtime {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        let outcome = RunOutcome {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(status = ?outcome.status, "Rscript finished");
        Ok(outcome)
    }
}
