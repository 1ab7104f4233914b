//! Save every pane's scrollback to log files

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use panepool_core::{CaptureOutcome, OutputCapture, OutputFormat, SaveReport, SessionName};

use super::{print_json, CommandContext};

#[derive(Debug, Clone)]
pub struct SaveOutputsOptions {
    pub session: SessionName,
    /// `None` uses `log_dir` from config
    pub dir: Option<PathBuf>,
    pub format: OutputFormat,
}

fn print_report(out: &mut impl Write, report: &SaveReport) -> Result<()> {
    for pane in &report.panes {
        let note = match &pane.outcome {
            CaptureOutcome::Saved { bytes } => format!("{bytes} bytes"),
            CaptureOutcome::Empty => "empty".to_string(),
            CaptureOutcome::Failed { reason } => format!("failed: {reason}"),
        };
        writeln!(out, "  {}  ({note})", pane.file.display())?;
    }
    writeln!(
        out,
        "Saved {} of {} panes to {}",
        report.saved(),
        report.attempted,
        report.directory.display()
    )?;
    Ok(())
}

pub async fn run(
    ctx: &CommandContext,
    options: &SaveOutputsOptions,
    out: &mut impl Write,
) -> Result<()> {
    let dir = options
        .dir
        .clone()
        .unwrap_or_else(|| ctx.config.log_dir.clone());

    let report = OutputCapture::new(ctx.mux())
        .save_all(
            &options.session,
            &dir,
            ctx.config.capture_lines,
            Local::now().naive_local(),
        )
        .await?;

    if options.format.is_json() {
        print_json(out, "save-outputs-response", "single", &report)
    } else {
        print_report(out, &report)
    }
}

pub async fn run_with_options(options: &SaveOutputsOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc};

    use panepool_core::tmux::testing::FakeMultiplexer;

    use super::*;
    use crate::commands::test_support::{context, name, text};

    #[tokio::test]
    async fn test_save_reports_each_pane() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        let ids = fake.seed_session("proj", Path::new("/w"), 2);
        fake.set_capture(&ids[0], "hello\n");
        let logs = tempfile::tempdir()?;
        let ctx = context(&fake, Path::new("/projects"), true);
        let options = SaveOutputsOptions {
            session: name("proj"),
            dir: Some(logs.path().to_path_buf()),
            format: OutputFormat::Human,
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        let out = text(out);
        assert!(out.contains("0_localhost.log  (6 bytes)"));
        assert!(out.contains("1_localhost.log  (empty)"));
        assert!(out.contains("Saved 1 of 2 panes to "));
        let dirs = std::fs::read_dir(logs.path())?.count();
        assert_eq!(dirs, 1);
        Ok(())
    }
}
