//! Append agent panes to an existing session

use std::io::Write;

use anyhow::Result;
use panepool_core::{
    AgentAssigner, AgentCounts, OutputFormat, PaneAllocator, SessionName, SessionRegistry,
};

use super::{print_json, spawn::print_assignments, CommandContext};

#[derive(Debug, Clone)]
pub struct AddOptions {
    pub session: SessionName,
    pub counts: AgentCounts,
    pub format: OutputFormat,
}

pub async fn run(ctx: &CommandContext, options: &AddOptions, out: &mut impl Write) -> Result<()> {
    SessionRegistry::new(ctx.mux())
        .require(&options.session)
        .await?;

    let workdir = ctx.mux().session_path(&options.session).await?;
    let window = PaneAllocator::new(ctx.mux())
        .first_window(&options.session)
        .await?;
    let assignments = AgentAssigner::new(ctx.mux(), &ctx.config.agents)
        .append(&window, &workdir, &options.counts)
        .await?;

    if options.format.is_json() {
        print_json(out, "add-response", "array", &assignments)
    } else {
        print_assignments(out, &options.session, &assignments)
    }
}

pub async fn run_with_options(options: &AddOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
