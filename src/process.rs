//! Thin builder over `std::process::Command` for invoking external tools.
//!
//! Every compression, parity, and ISO-authoring step in this crate is
//! delegated to a command-line program. This wrapper keeps the call sites
//! declarative and gives them a uniform failure contract: a nonzero exit is
//! an error unless `allow_fail` is set.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    status: ExitStatus,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Builder for a single external command invocation.
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    allow_fail: bool,
    error_msg: Option<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            allow_fail: false,
            error_msg: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Append a path argument without lossy string conversion.
    pub fn arg_path(mut self, path: impl AsRef<Path>) -> Self {
        self.args.push(path.as_ref().as_os_str().to_os_string());
        self
    }

    /// Run the command with the given working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Treat a nonzero exit as a normal outcome instead of an error.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Message to use when the command exits nonzero.
    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.error_msg = Some(msg.as_ref().to_string());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }

    fn failure(&self, status: ExitStatus, stderr: &str) -> anyhow::Error {
        let detail = match &self.error_msg {
            Some(msg) => msg.clone(),
            None => format!("{} exited with {}", self.program, status),
        };
        if stderr.trim().is_empty() {
            anyhow::anyhow!("{}", detail)
        } else {
            anyhow::anyhow!("{}\n{}", detail, stderr.trim())
        }
    }

    /// Run the command, capturing stdout and stderr.
    pub fn run(self) -> Result<CmdOutput> {
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        let result = CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status,
        };

        if !result.success() && !self.allow_fail {
            return Err(self.failure(output.status, &result.stderr));
        }

        Ok(result)
    }

    /// Run the command with inherited stdio so the user sees its progress.
    pub fn run_interactive(self) -> Result<()> {
        let status = self
            .command()
            .status()
            .with_context(|| format!("failed to run {}", self.program))?;

        if !status.success() && !self.allow_fail {
            return Err(self.failure(status, ""));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_nonzero_exit_is_an_error() {
        let result = Cmd::new("false").run();
        assert!(result.is_err());
    }

    #[test]
    fn test_allow_fail_suppresses_the_error() {
        let result = Cmd::new("false").allow_fail().run().unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_error_msg_is_surfaced() {
        let err = Cmd::new("false")
            .error_msg("false failed as expected")
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("false failed as expected"));
    }

    #[test]
    fn test_current_dir_is_respected() {
        let result = Cmd::new("pwd").current_dir("/").run().unwrap();
        assert_eq!(result.stdout.trim(), "/");
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let result = Cmd::new("definitely_not_a_real_command_12345").run();
        assert!(result.is_err());
    }
}
