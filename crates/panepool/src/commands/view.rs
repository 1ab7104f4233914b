//! Re-tile every window, then attach

use std::io::Write;

use anyhow::Result;
use panepool_core::{SessionName, ViewManager};

use super::CommandContext;

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub session: SessionName,
    pub no_attach: bool,
}

pub async fn run(ctx: &CommandContext, options: &ViewOptions, out: &mut impl Write) -> Result<()> {
    let windows = ViewManager::new(ctx.mux())
        .retile_all(&options.session)
        .await?;
    writeln!(out, "Tiled {windows} window(s) in '{}'", options.session)?;
    ctx.attach(&options.session, options.no_attach, out).await
}

pub async fn run_with_options(options: &ViewOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
