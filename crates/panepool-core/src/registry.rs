//! Session existence, creation, enumeration and destruction.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::{
    confirm::Confirm,
    tmux::Multiplexer,
    types::{SessionName, SessionSummary},
    Error, Result,
};

/// A session known to exist after [`SessionRegistry::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionHandle {
    pub name: SessionName,
    pub workdir: PathBuf,
    /// False when the session already existed and nothing was done
    pub created: bool,
}

/// Result of [`SessionRegistry::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Destroyed,
    /// Confirmation was declined; the session is untouched
    Cancelled,
}

pub struct SessionRegistry<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> SessionRegistry<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    pub async fn exists(&self, name: &SessionName) -> Result<bool> {
        self.mux.has_session(name).await
    }

    /// Fail with `SessionNotFound` unless the session exists.
    pub async fn require(&self, name: &SessionName) -> Result<()> {
        if self.exists(name).await? {
            Ok(())
        } else {
            Err(Error::session_not_found(name.as_str()))
        }
    }

    /// Ensure the session exists with one window rooted at `workdir`,
    /// creating the directory first when missing. Idempotent.
    ///
    /// An existing session keeps its own directory: the returned handle
    /// carries the path tmux reports, which may differ from `workdir`.
    pub async fn create(&self, name: &SessionName, workdir: &Path) -> Result<SessionHandle> {
        if self.exists(name).await? {
            return Ok(SessionHandle {
                name: name.clone(),
                workdir: self.mux.session_path(name).await?,
                created: false,
            });
        }

        tokio::fs::create_dir_all(workdir).await.map_err(|e| {
            Error::io_error(format!(
                "Failed to create working directory {}: {e}",
                workdir.display()
            ))
        })?;
        self.mux.new_session(name, workdir).await?;
        info!(session = %name, workdir = %workdir.display(), "created session");

        Ok(SessionHandle {
            name: name.clone(),
            workdir: workdir.to_path_buf(),
            created: true,
        })
    }

    /// Kill the session and every process in it.
    ///
    /// Unless `force`, `confirm` must agree first. A declined prompt returns
    /// [`Teardown::Cancelled`]; a confirmer that cannot answer fails.
    pub async fn destroy(
        &self,
        name: &SessionName,
        force: bool,
        confirm: &dyn Confirm,
    ) -> Result<Teardown> {
        self.require(name).await?;

        if !force {
            let prompt = format!("Kill session '{name}' and all its panes?");
            if !confirm.confirm(&prompt)? {
                return Ok(Teardown::Cancelled);
            }
        }

        self.mux.kill_session(name).await?;
        info!(session = %name, "destroyed session");
        Ok(Teardown::Destroyed)
    }

    /// Every session, in multiplexer order. Empty when none exist.
    pub async fn list(&self) -> Result<Vec<SessionSummary>> {
        self.mux.list_sessions().await
    }
}
