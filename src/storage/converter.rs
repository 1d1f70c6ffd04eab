//! External document converter
//!
//! Item markup is streamed to the converter's stdin; the converter writes the
//! artifact to the path given in its arguments. By default this is pandoc
//! producing a `.docx`.

use crate::config::ConverterConfig;
use crate::storage::traits::Persister;
use crate::HarvestError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// A `Persister` backed by an external program
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Checks once whether the program can be launched at all
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Expands `{output}` and `{title}` in the argument template
    fn expand_args(&self, destination: &Path) -> Vec<String> {
        let output = destination.display().to_string();
        let title = destination
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.args
            .iter()
            .map(|arg| arg.replace("{output}", &output).replace("{title}", &title))
            .collect()
    }

    fn conversion_error(destination: &Path, message: impl Into<String>) -> HarvestError {
        HarvestError::Conversion {
            path: destination.to_path_buf(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Persister for CommandConverter {
    async fn persist(&self, content: &str, destination: &Path) -> Result<(), HarvestError> {
        let mut child = Command::new(&self.program)
            .args(self.expand_args(destination))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Self::conversion_error(destination, format!("cannot run {}: {}", self.program, e))
            })?;

        // Stdin is fed from its own task while stderr is drained below, so a
        // converter that writes diagnostics before reading cannot block us
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = content.as_bytes().to_vec();
            tokio::spawn(async move {
                stdin.write_all(&bytes).await
                // Dropping stdin closes the pipe so the converter sees EOF
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Self::conversion_error(destination, e.to_string()))?;

        let write_error = match writer {
            Some(handle) => match handle.await {
                Ok(result) => result.err().map(|e| e.to_string()),
                Err(join_error) => Some(join_error.to_string()),
            },
            None => None,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::conversion_error(
                destination,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        if let Some(e) = write_error {
            return Err(Self::conversion_error(
                destination,
                format!("failed to stream content: {}", e),
            ));
        }

        Ok(())
    }
}
