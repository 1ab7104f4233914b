//! Ctrl-C every agent pane

use std::io::Write;

use anyhow::Result;
use panepool_core::{CommandRouter, OutputFormat, SessionName};

use super::{send::report, CommandContext};

#[derive(Debug, Clone)]
pub struct InterruptOptions {
    pub session: SessionName,
    pub format: OutputFormat,
}

pub async fn run(
    ctx: &CommandContext,
    options: &InterruptOptions,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = CommandRouter::new(ctx.mux())
        .interrupt(&options.session)
        .await?;
    report(out, &outcome, "Interrupted", options.format)
}

pub async fn run_with_options(options: &InterruptOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
