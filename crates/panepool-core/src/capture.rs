//! Pane scrollback capture, single and batch.
//!
//! Emptiness is data here. [`Capture::Empty`] and [`CaptureOutcome`] let the
//! caller decide whether an empty or failed pane matters; the clipboard path
//! rejects empty text while the file export records it and moves on.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    allocator::PaneAllocator,
    registry::SessionRegistry,
    tmux::{Multiplexer, PaneScope},
    types::{PaneId, PaneInfo, SessionName},
    Error, Result,
};

/// Pane address accepted from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneSelector {
    /// Index within the session's first window
    Index(u32),
    /// Stable pane id (`%N`)
    Id(PaneId),
}

impl FromStr for PaneSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('%') {
            return PaneId::parse(s)
                .map(Self::Id)
                .map_err(|_| Error::usage(format!("invalid pane id '{s}'")));
        }
        s.parse()
            .map(Self::Index)
            .map_err(|_| Error::usage(format!("pane must be a non-negative index or %id, got '{s}'")))
    }
}

impl fmt::Display for PaneSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Captured scrollback of one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Text(String),
    /// Nothing but whitespace was captured
    Empty,
}

impl Capture {
    fn from_output(text: String) -> Self {
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }
}

/// What happened to one pane during [`OutputCapture::save_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CaptureOutcome {
    Saved { bytes: usize },
    Empty,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedPane {
    pub window_index: u32,
    pub index: u32,
    pub title: String,
    pub file: PathBuf,
    #[serde(flatten)]
    pub outcome: CaptureOutcome,
}

/// Result of a batch capture. `attempted` counts every pane, including
/// empty and failed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub session: String,
    pub directory: PathBuf,
    pub attempted: usize,
    pub panes: Vec<SavedPane>,
}

impl SaveReport {
    #[must_use]
    pub fn saved(&self) -> usize {
        self.panes
            .iter()
            .filter(|p| matches!(p.outcome, CaptureOutcome::Saved { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.panes
            .iter()
            .filter(|p| matches!(p.outcome, CaptureOutcome::Failed { .. }))
            .count()
    }
}

/// Map every non-alphanumeric character to `_`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{index}_{title}.log`, prefixed with the window index when that name is
/// already taken by a pane in an earlier window.
fn log_file_name(pane: &PaneInfo, taken: &HashSet<String>) -> String {
    let plain = format!("{}_{}.log", pane.index, sanitize_title(&pane.title));
    if taken.contains(&plain) {
        format!(
            "{}-{}_{}.log",
            pane.window_index,
            pane.index,
            sanitize_title(&pane.title)
        )
    } else {
        plain
    }
}

pub struct OutputCapture<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> OutputCapture<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    async fn resolve(&self, session: &SessionName, selector: &PaneSelector) -> Result<PaneId> {
        let panes = match selector {
            PaneSelector::Index(_) => {
                let window = PaneAllocator::new(self.mux).first_window(session).await?;
                self.mux.list_panes(PaneScope::Window(&window)).await?
            }
            PaneSelector::Id(_) => self.mux.list_panes(PaneScope::Session(session)).await?,
        };
        panes
            .into_iter()
            .find(|p| match selector {
                PaneSelector::Index(index) => p.index == *index,
                PaneSelector::Id(id) => &p.id == id,
            })
            .map(|p| p.id)
            .ok_or_else(|| Error::pane_not_found(session.as_str(), selector.to_string()))
    }

    /// Last `lines` lines of one pane.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` or `PaneNotFound` when the address does not resolve.
    pub async fn capture_pane(
        &self,
        session: &SessionName,
        selector: &PaneSelector,
        lines: u32,
    ) -> Result<Capture> {
        SessionRegistry::new(self.mux).require(session).await?;
        let pane = self.resolve(session, selector).await?;
        let text = self.mux.capture_pane(&pane, lines).await?;
        Ok(Capture::from_output(text))
    }

    /// Capture every pane into a new `{output_dir}/{session}_{timestamp}/`.
    ///
    /// One pane failing does not stop the batch: its file is written empty
    /// and the failure is recorded in the report.
    ///
    /// # Errors
    ///
    /// `SessionNotFound`, or failure to list panes or create the directory.
    pub async fn save_all(
        &self,
        session: &SessionName,
        output_dir: &Path,
        lines: u32,
        timestamp: NaiveDateTime,
    ) -> Result<SaveReport> {
        SessionRegistry::new(self.mux).require(session).await?;
        let panes = self.mux.list_panes(PaneScope::Session(session)).await?;

        let base = format!("{session}_{}", timestamp.format("%Y%m%d_%H%M%S"));
        let directory = fresh_directory(output_dir, &base).await?;

        let mut taken = HashSet::new();
        let mut saved = Vec::with_capacity(panes.len());
        for pane in &panes {
            let name = log_file_name(pane, &taken);
            let file = directory.join(&name);
            taken.insert(name);

            let (contents, outcome) = match self.mux.capture_pane(&pane.id, lines).await {
                Ok(text) if text.trim().is_empty() => (String::new(), CaptureOutcome::Empty),
                Ok(text) => {
                    let bytes = text.len();
                    (text, CaptureOutcome::Saved { bytes })
                }
                Err(e) => {
                    warn!(pane = %pane.id, error = %e, "capture failed");
                    (
                        String::new(),
                        CaptureOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                }
            };

            let outcome = match tokio::fs::write(&file, contents).await {
                Ok(()) => outcome,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "write failed");
                    CaptureOutcome::Failed {
                        reason: format!("write {}: {e}", file.display()),
                    }
                }
            };

            saved.push(SavedPane {
                window_index: pane.window_index,
                index: pane.index,
                title: pane.title.clone(),
                file,
                outcome,
            });
        }

        info!(session = %session, panes = saved.len(), dir = %directory.display(), "saved outputs");
        Ok(SaveReport {
            session: session.to_string(),
            directory,
            attempted: saved.len(),
            panes: saved,
        })
    }
}

/// Create `{parent}/{base}`, or `{base}_1`, `{base}_2`, ... when an earlier
/// export in the same second already holds the name.
async fn fresh_directory(parent: &Path, base: &str) -> Result<PathBuf> {
    let io_error = |path: &Path, e: std::io::Error| {
        Error::io_error(format!(
            "Failed to create output directory {}: {e}",
            path.display()
        ))
    };
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| io_error(parent, e))?;

    let mut suffix = 0_u32;
    loop {
        let candidate = match suffix {
            0 => parent.join(base),
            n => parent.join(format!("{base}_{n}")),
        };
        match tokio::fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(io_error(&candidate, e)),
        }
    }
}
