//! Command implementations.
//!
//! Each command takes an options struct whose fields were validated from
//! the command line. `run` drives the core components against a
//! [`CommandContext`] and writes to `out`; `run_with_options` connects to
//! tmux and runs against stdout.

pub mod add;
pub mod broadcast;
pub mod copy_output;
pub mod create;
pub mod interrupt;
pub mod kill;
pub mod list;
pub mod quick_setup;
pub mod reconnect;
pub mod save_outputs;
pub mod send;
pub mod spawn;
pub mod status;
pub mod view;
pub mod zoom;

use std::{io::Write, sync::Arc};

use anyhow::Result;
use panepool_core::{config::load_config, Config, Confirm, Multiplexer, SessionName};
use serde::Serialize;

use crate::{
    bootstrap,
    cli::{is_inside_tmux, is_terminal, StdinConfirm},
};

/// Loaded configuration plus the multiplexer and prompt the commands run
/// against.
pub struct CommandContext {
    pub config: Config,
    mux: Arc<dyn Multiplexer>,
    confirm: Box<dyn Confirm>,
    terminal: bool,
    inside_tmux: bool,
}

impl CommandContext {
    /// Load configuration, then make sure tmux is available.
    pub async fn connect() -> Result<Self> {
        let config = load_config()?;
        let inside_tmux = is_inside_tmux();
        let tmux = bootstrap::ensure_tmux(&config.tmux_binary, inside_tmux).await?;
        Ok(Self::new(config, Arc::new(tmux), Box::new(StdinConfirm))
            .with_terminal(is_terminal(), inside_tmux))
    }

    /// A context with no terminal attached and outside any tmux client.
    pub fn new(config: Config, mux: Arc<dyn Multiplexer>, confirm: Box<dyn Confirm>) -> Self {
        Self {
            config,
            mux,
            confirm,
            terminal: false,
            inside_tmux: false,
        }
    }

    #[must_use]
    pub fn with_terminal(mut self, terminal: bool, inside_tmux: bool) -> Self {
        self.terminal = terminal;
        self.inside_tmux = inside_tmux;
        self
    }

    pub fn mux(&self) -> &dyn Multiplexer {
        self.mux.as_ref()
    }

    pub fn confirm(&self) -> &dyn Confirm {
        self.confirm.as_ref()
    }

    /// Whether prompts can be answered interactively.
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Attach (or switch the current client) unless `skip` is set. Without
    /// a terminal, prints how to attach instead.
    pub async fn attach(
        &self,
        session: &SessionName,
        skip: bool,
        out: &mut impl Write,
    ) -> Result<()> {
        if skip {
            return Ok(());
        }
        if !self.inside_tmux && !self.terminal {
            writeln!(
                out,
                "Not attaching (no terminal). Attach with: tmux attach -t {session}"
            )?;
            return Ok(());
        }
        self.mux.attach(session).await?;
        Ok(())
    }
}

/// Print `data` in a schema envelope as one JSON line.
pub fn print_json<T: Serialize>(
    out: &mut impl Write,
    schema: &str,
    kind: &str,
    data: T,
) -> Result<()> {
    let envelope = panepool_core::json::SchemaEnvelope::new(schema, kind, data);
    writeln!(out, "{}", envelope.to_json()?)?;
    Ok(())
}
