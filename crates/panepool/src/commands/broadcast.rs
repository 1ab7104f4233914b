//! Send a prompt to every pane of one agent type, or to all agents

use std::io::Write;

use anyhow::Result;
use panepool_core::{BroadcastTarget, CommandRouter, OutputFormat, SessionName};

use super::{send::report, CommandContext};

#[derive(Debug, Clone)]
pub struct BroadcastOptions {
    pub session: SessionName,
    pub target: BroadcastTarget,
    pub prompt: String,
    pub format: OutputFormat,
}

pub async fn run(
    ctx: &CommandContext,
    options: &BroadcastOptions,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = CommandRouter::new(ctx.mux())
        .broadcast(&options.session, options.target, &options.prompt)
        .await?;
    report(out, &outcome, "Broadcast to", options.format)
}

pub async fn run_with_options(options: &BroadcastOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
