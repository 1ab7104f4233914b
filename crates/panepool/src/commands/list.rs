//! List tmux sessions

use std::io::Write;

use anyhow::Result;
use panepool_core::{OutputFormat, SessionRegistry, SessionSummary};

use super::{print_json, CommandContext};

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub format: OutputFormat,
}

fn print_table(out: &mut impl Write, sessions: &[SessionSummary]) -> Result<()> {
    if sessions.is_empty() {
        writeln!(out, "No tmux sessions found.")?;
        return Ok(());
    }

    let width = sessions
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("SESSION".len());
    writeln!(out, "{:<width$}  {:>7}  {:<8}  PATH", "SESSION", "WINDOWS", "ATTACHED")?;
    for session in sessions {
        let attached = if session.attached { "yes" } else { "no" };
        writeln!(
            out,
            "{:<width$}  {:>7}  {:<8}  {}",
            session.name, session.windows, attached, session.path
        )?;
    }
    Ok(())
}

pub async fn run(ctx: &CommandContext, options: &ListOptions, out: &mut impl Write) -> Result<()> {
    let sessions = SessionRegistry::new(ctx.mux()).list().await?;

    if options.format.is_json() {
        print_json(out, "list-response", "array", &sessions)
    } else {
        print_table(out, &sessions)
    }
}

pub async fn run_with_options(options: &ListOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
