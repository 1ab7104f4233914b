//! Copy one pane's recent output to the clipboard

use std::io::Write;

use anyhow::{bail, Result};
use panepool_core::{Capture, OutputCapture, PaneSelector, SessionName};

use super::CommandContext;
use crate::clipboard::{ClipboardSink, CommandClipboard};

#[derive(Debug, Clone)]
pub struct CopyOutputOptions {
    pub session: SessionName,
    pub pane: PaneSelector,
    /// `None` uses `copy_lines` from config
    pub lines: Option<u32>,
}

/// Capture the pane and hand its text to `clipboard`. Empty output is an
/// error and leaves the clipboard untouched.
pub async fn run(
    ctx: &CommandContext,
    options: &CopyOutputOptions,
    clipboard: &impl ClipboardSink,
    out: &mut impl Write,
) -> Result<()> {
    let lines = options.lines.unwrap_or(ctx.config.copy_lines);

    let capture = OutputCapture::new(ctx.mux())
        .capture_pane(&options.session, &options.pane, lines)
        .await?;
    let Capture::Text(text) = capture else {
        bail!(
            "Pane {} in session '{}' has no output to copy",
            options.pane,
            options.session
        );
    };

    clipboard.copy(&text).await?;
    writeln!(
        out,
        "Copied {} lines from pane {} to the clipboard ({})",
        text.lines().count(),
        options.pane,
        clipboard.name()
    )?;
    Ok(())
}

pub async fn run_with_options(options: &CopyOutputOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    let clipboard = CommandClipboard::detect()?;
    run(&ctx, options, &clipboard, &mut std::io::stdout()).await
}
