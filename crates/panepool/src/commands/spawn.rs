//! Create a session and launch agents into it

use std::io::Write;

use anyhow::Result;
use panepool_core::{
    AgentAssigner, AgentCounts, Assignment, PaneAllocator, SessionHandle, SessionName,
    SessionRegistry,
};

use super::CommandContext;

/// The first pane stays an untagged user shell.
const RESERVED_SLOTS: usize = 1;

#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub session: SessionName,
    pub counts: AgentCounts,
    pub no_attach: bool,
}

/// Ensure the session, reconcile to `1 + total` panes, tag and launch.
/// Agents start in the session's own directory.
pub async fn spawn_agents(
    ctx: &CommandContext,
    options: &SpawnOptions,
) -> Result<(SessionHandle, Vec<Assignment>)> {
    let handle = SessionRegistry::new(ctx.mux())
        .create(&options.session, &ctx.config.session_dir(&options.session))
        .await?;
    let window = PaneAllocator::new(ctx.mux())
        .first_window(&options.session)
        .await?;
    let assignments = AgentAssigner::new(ctx.mux(), &ctx.config.agents)
        .assign(&window, &handle.workdir, &options.counts, RESERVED_SLOTS)
        .await?;
    Ok((handle, assignments))
}

pub fn print_assignments(
    out: &mut impl Write,
    session: &SessionName,
    assignments: &[Assignment],
) -> Result<()> {
    writeln!(out, "Launched {} agents in session '{session}':", assignments.len())?;
    for assignment in assignments {
        writeln!(out, "  {:<6} {}", assignment.pane.as_str(), assignment.tag)?;
    }
    Ok(())
}

pub async fn run(ctx: &CommandContext, options: &SpawnOptions, out: &mut impl Write) -> Result<()> {
    let (_, assignments) = spawn_agents(ctx, options).await?;
    print_assignments(out, &options.session, &assignments)?;
    ctx.attach(&options.session, options.no_attach, out).await
}

pub async fn run_with_options(options: &SpawnOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
