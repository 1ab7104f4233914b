//! Zoom one pane, then attach

use std::io::Write;

use anyhow::Result;
use panepool_core::{SessionName, ViewManager, ZoomTarget};

use super::CommandContext;

#[derive(Debug, Clone)]
pub struct ZoomOptions {
    pub session: SessionName,
    pub target: ZoomTarget,
    pub no_attach: bool,
}

pub async fn run(ctx: &CommandContext, options: &ZoomOptions, out: &mut impl Write) -> Result<()> {
    let pane = ViewManager::new(ctx.mux())
        .zoom(&options.session, options.target)
        .await?;
    writeln!(
        out,
        "Zoomed pane {pane} ({}) in '{}'",
        options.target,
        options.session
    )?;
    ctx.attach(&options.session, options.no_attach, out).await
}

pub async fn run_with_options(options: &ZoomOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
