//! Kill a session

use std::io::Write;

use anyhow::Result;
use panepool_core::{SessionName, SessionRegistry, Teardown};

use super::CommandContext;

#[derive(Debug, Clone)]
pub struct KillOptions {
    pub session: SessionName,
    pub force: bool,
}

pub async fn run(ctx: &CommandContext, options: &KillOptions, out: &mut impl Write) -> Result<()> {
    let teardown = SessionRegistry::new(ctx.mux())
        .destroy(&options.session, options.force, ctx.confirm())
        .await?;

    match teardown {
        Teardown::Destroyed => writeln!(out, "Killed session '{}'", options.session)?,
        Teardown::Cancelled => writeln!(out, "Kill cancelled")?,
    }
    Ok(())
}

pub async fn run_with_options(options: &KillOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
