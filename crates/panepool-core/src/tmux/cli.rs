//! [`Multiplexer`] backed by the tmux command-line client.

use std::{
    path::{Path, PathBuf},
    process::Output,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{
    parse::{parse_panes, parse_sessions, parse_windows, PANE_FORMAT, SESSION_FORMAT, WINDOW_FORMAT},
    Multiplexer, PaneScope,
};
use crate::{
    types::{PaneId, PaneInfo, SessionName, SessionSummary, WindowInfo, WindowRef},
    Error, Result,
};

/// Platform-specific install hint shown when tmux cannot be found.
#[must_use]
pub fn install_guidance() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install it with: brew install tmux"
    } else if cfg!(target_os = "linux") {
        "Install it with your package manager, for example:\n  \
         sudo apt-get install tmux\n  \
         sudo dnf install tmux\n  \
         sudo pacman -S tmux"
    } else {
        "Install tmux from https://github.com/tmux/tmux/wiki/Installing"
    }
}

/// Real tmux backend. Every call spawns one `tmux` process and waits for it.
#[derive(Debug, Clone)]
pub struct TmuxCli {
    binary: PathBuf,
    inside_client: bool,
}

impl TmuxCli {
    /// Resolve `binary` (a name on `PATH` or a path) to an executable.
    ///
    /// `inside_client` selects `switch-client` over `attach-session` when
    /// attaching, for invocations made from inside a tmux pane.
    ///
    /// # Errors
    ///
    /// Returns `DependencyMissing` if the binary cannot be found.
    pub fn locate(binary: &str, inside_client: bool) -> Result<Self> {
        let resolved = which::which(binary)
            .map_err(|_| Error::dependency_missing(binary, install_guidance()))?;
        debug!(binary = %resolved.display(), inside_client, "using tmux");
        Ok(Self {
            binary: resolved,
            inside_client,
        })
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, "tmux");
        Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::dependency_missing("tmux", install_guidance())
                } else {
                    Error::io_error(format!("Failed to execute tmux: {e}"))
                }
            })
    }

    /// Run a tmux subcommand, failing on non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if output.status.success() {
            String::from_utf8(output.stdout)
                .map_err(|e| Error::parse_error(format!("Invalid UTF-8 in tmux output: {e}")))
        } else {
            let operation = args.first().copied().unwrap_or("command");
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::command_error("tmux", operation, stderr.trim()))
        }
    }
}

fn window_target(window: &WindowRef) -> String {
    format!("={}", window.target())
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::io_error(format!("Path is not valid UTF-8: {}", path.display())))
}

fn no_server(stderr: &str) -> bool {
    stderr.contains("no server running")
        || stderr.contains("error connecting")
        || stderr.contains("No such file or directory")
}

#[async_trait]
impl Multiplexer for TmuxCli {
    async fn has_session(&self, session: &SessionName) -> Result<bool> {
        let output = self
            .output(&["has-session", "-t", &session.exact_target()])
            .await?;
        Ok(output.status.success())
    }

    async fn new_session(&self, session: &SessionName, workdir: &Path) -> Result<()> {
        self.run(&[
            "new-session",
            "-d",
            "-s",
            session.as_str(),
            "-c",
            path_arg(workdir)?,
        ])
        .await
        .map(|_| ())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let output = self.output(&["list-sessions", "-F", SESSION_FORMAT]).await?;
        if output.status.success() {
            parse_sessions(&String::from_utf8_lossy(&output.stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if no_server(&stderr) {
                Ok(Vec::new())
            } else {
                Err(Error::command_error("tmux", "list-sessions", stderr.trim()))
            }
        }
    }

    async fn kill_session(&self, session: &SessionName) -> Result<()> {
        self.run(&["kill-session", "-t", &session.exact_target()])
            .await
            .map(|_| ())
    }

    async fn session_path(&self, session: &SessionName) -> Result<PathBuf> {
        let out = self
            .run(&[
                "display-message",
                "-p",
                "-t",
                &session.exact_target(),
                "#{session_path}",
            ])
            .await?;
        Ok(PathBuf::from(out.trim_end_matches('\n')))
    }

    async fn list_windows(&self, session: &SessionName) -> Result<Vec<WindowInfo>> {
        let out = self
            .run(&["list-windows", "-t", &session.exact_target(), "-F", WINDOW_FORMAT])
            .await?;
        parse_windows(&out)
    }

    async fn list_panes(&self, scope: PaneScope<'_>) -> Result<Vec<PaneInfo>> {
        let out = match scope {
            PaneScope::Window(window) => {
                self.run(&["list-panes", "-t", &window_target(window), "-F", PANE_FORMAT])
                    .await?
            }
            PaneScope::Session(session) => {
                self.run(&[
                    "list-panes",
                    "-s",
                    "-t",
                    &session.exact_target(),
                    "-F",
                    PANE_FORMAT,
                ])
                .await?
            }
        };
        parse_panes(&out)
    }

    async fn split_window(&self, window: &WindowRef, workdir: &Path) -> Result<PaneId> {
        let out = self
            .run(&[
                "split-window",
                "-t",
                &window_target(window),
                "-c",
                path_arg(workdir)?,
                "-P",
                "-F",
                "#{pane_id}",
            ])
            .await?;
        PaneId::parse(out.trim())
    }

    async fn apply_tiled_layout(&self, window: &WindowRef) -> Result<()> {
        self.run(&["select-layout", "-t", &window_target(window), "tiled"])
            .await
            .map(|_| ())
    }

    async fn set_pane_title(&self, pane: &PaneId, title: &str) -> Result<()> {
        self.run(&["select-pane", "-t", pane.as_str(), "-T", title])
            .await
            .map(|_| ())
    }

    async fn send_text(&self, pane: &PaneId, text: &str) -> Result<()> {
        self.run(&["send-keys", "-t", pane.as_str(), "-l", "--", text])
            .await?;
        self.run(&["send-keys", "-t", pane.as_str(), "Enter"])
            .await
            .map(|_| ())
    }

    async fn send_interrupt(&self, pane: &PaneId) -> Result<()> {
        self.run(&["send-keys", "-t", pane.as_str(), "C-c"])
            .await
            .map(|_| ())
    }

    async fn capture_pane(&self, pane: &PaneId, lines: u32) -> Result<String> {
        let start = format!("-{lines}");
        self.run(&["capture-pane", "-p", "-J", "-t", pane.as_str(), "-S", &start])
            .await
    }

    async fn select_window(&self, window: &WindowRef) -> Result<()> {
        self.run(&["select-window", "-t", &window_target(window)])
            .await
            .map(|_| ())
    }

    async fn select_pane(&self, pane: &PaneId) -> Result<()> {
        self.run(&["select-pane", "-t", pane.as_str()])
            .await
            .map(|_| ())
    }

    async fn toggle_zoom(&self, window: &WindowRef) -> Result<()> {
        self.run(&["resize-pane", "-Z", "-t", &window_target(window)])
            .await
            .map(|_| ())
    }

    async fn attach(&self, session: &SessionName) -> Result<()> {
        let target = session.exact_target();
        if self.inside_client {
            return self
                .run(&["switch-client", "-t", &target])
                .await
                .map(|_| ());
        }
        attach_foreground(&self.binary, &target)
    }
}

/// Replace this process with `tmux attach-session`.
#[cfg(unix)]
fn attach_foreground(binary: &Path, target: &str) -> Result<()> {
    use std::os::unix::process::CommandExt;

    debug!(target, "exec tmux attach-session");
    let err = std::process::Command::new(binary)
        .args(["attach-session", "-t", target])
        .exec();
    Err(Error::io_error(format!("Failed to exec into tmux: {err}")))
}

#[cfg(not(unix))]
fn attach_foreground(binary: &Path, target: &str) -> Result<()> {
    let status = std::process::Command::new(binary)
        .args(["attach-session", "-t", target])
        .status()
        .map_err(|e| Error::io_error(format!("Failed to execute tmux: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::command_error("tmux", "attach-session", status.to_string()))
    }
}
