//! Typed wrapper around the external `mulmo` command-line tool.
//!
//! The tool turns a MulmoScript JSON file into media artifacts as a side
//! effect, one subcommand per stage:
//!
//! ```text
//! mulmo audio  <script.json>
//! mulmo images <script.json>
//! mulmo movie  <script.json> [-c <lang>]
//! ```
//!
//! This crate only builds the command line, runs it, and captures output.
//! It knows nothing about jobs or HTTP.

use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Result type for mulmo invocations.
pub type Result<T> = std::result::Result<T, MulmoError>;

/// Errors from invoking the external tool.
#[derive(Debug, Error)]
pub enum MulmoError {
    /// The binary could not be launched at all (missing from PATH, not
    /// executable, ...).
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited non-zero. Both captured streams are kept so
    /// the failure message carries the tool's own diagnostics.
    #[error("`{command}` failed with {status}\nstdout: {stdout}\nstderr: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    },
}

/// Handle to the external `mulmo` binary. The tool runs from the server's
/// working directory, so relative script paths resolve the same way for
/// both.
#[derive(Debug, Clone)]
pub struct MulmoCli {
    binary: String,
    bgm_path: Option<PathBuf>,
}

impl MulmoCli {
    /// Create a handle using the given binary name or path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            bgm_path: None,
        }
    }

    /// Background music file, exported to the tool as `PATH_BGM`.
    pub fn with_bgm_path(mut self, path: Option<PathBuf>) -> Self {
        self.bgm_path = path;
        self
    }

    /// `mulmo audio <script>` — generate narration audio segments.
    pub async fn audio(&self, script: &Path) -> Result<String> {
        self.run(&audio_args(script)).await
    }

    /// `mulmo images <script>` — generate one image per beat.
    pub async fn images(&self, script: &Path) -> Result<String> {
        self.run(&images_args(script)).await
    }

    /// `mulmo movie <script>` — assemble the final video, optionally with
    /// burned-in subtitles in the given language.
    pub async fn movie(&self, script: &Path, subtitle_lang: Option<&str>) -> Result<String> {
        self.run(&movie_args(script, subtitle_lang)).await
    }

    /// Run the binary with the given arguments, returning captured stdout.
    async fn run(&self, args: &[String]) -> Result<String> {
        let command_line = self.render(args);
        debug!(command = %command_line, "invoking mulmo");

        let mut command = Command::new(&self.binary);
        command.args(args);
        if let Some(bgm) = &self.bgm_path {
            command.env("PATH_BGM", bgm);
        }

        let Output {
            status,
            stdout,
            stderr,
        } = command.output().await.map_err(|source| MulmoError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        if !status.success() {
            return Err(MulmoError::CommandFailed {
                command: command_line,
                status,
                stdout,
                stderr,
            });
        }

        // The tool writes progress noise to stderr even on success.
        if !stderr.trim().is_empty() {
            warn!(command = %command_line, stderr = %stderr.trim(), "mulmo wrote to stderr");
        }

        Ok(stdout)
    }

    /// Human-readable command line for logs and error messages.
    fn render(&self, args: &[String]) -> String {
        let mut parts = vec![self.binary.clone()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }
}

fn audio_args(script: &Path) -> Vec<String> {
    vec!["audio".to_string(), script.display().to_string()]
}

fn images_args(script: &Path) -> Vec<String> {
    vec!["images".to_string(), script.display().to_string()]
}

fn movie_args(script: &Path, subtitle_lang: Option<&str>) -> Vec<String> {
    let mut args = vec!["movie".to_string(), script.display().to_string()];
    if let Some(lang) = subtitle_lang {
        args.push("-c".to_string());
        args.push(lang.to_string());
    }
    args
}
