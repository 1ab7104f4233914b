//! System clipboard through whichever copy utility is installed.

use std::{path::PathBuf, process::Stdio};

use anyhow::{bail, Context, Result};
use tokio::io::AsyncWriteExt;

/// Where copied pane output goes.
pub trait ClipboardSink {
    fn name(&self) -> &str;
    async fn copy(&self, text: &str) -> Result<()>;
}

/// Candidate utilities, in preference order, with the arguments that make
/// each read the clipboard contents from stdin.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// A clipboard utility found on `PATH`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    name: &'static str,
    program: PathBuf,
    args: &'static [&'static str],
}

impl CommandClipboard {
    /// Pick the first candidate that `lookup` can resolve.
    fn detect_with(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self> {
        CANDIDATES
            .iter()
            .find_map(|&(name, args)| {
                lookup(name).map(|program| Self {
                    name,
                    program,
                    args,
                })
            })
            .context(
                "No clipboard utility found. Install one of: pbcopy, wl-copy, xclip, xsel",
            )
    }

    pub fn detect() -> Result<Self> {
        Self::detect_with(|name| which::which(name).ok())
    }
}

impl ClipboardSink for CommandClipboard {
    fn name(&self) -> &str {
        self.name
    }

    async fn copy(&self, text: &str) -> Result<()> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.name))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            bail!(
                "{} failed: {}",
                self.name,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_earlier_candidates() -> Result<()> {
        let clipboard = CommandClipboard::detect_with(|name| match name {
            "xclip" | "xsel" => Some(PathBuf::from(format!("/usr/bin/{name}"))),
            _ => None,
        })?;
        assert_eq!(clipboard.name(), "xclip");
        assert_eq!(clipboard.args, ["-selection", "clipboard"]);
        Ok(())
    }

    #[test]
    fn test_detect_without_utilities_fails() {
        let result = CommandClipboard::detect_with(|_| None);
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("No clipboard utility"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_pipes_text_to_stdin() -> Result<()> {
        let Ok(cat) = which::which("cat") else {
            return Ok(());
        };
        let clipboard = CommandClipboard {
            name: "cat",
            program: cat,
            args: &[],
        };
        clipboard.copy("hello\n").await
    }
}
