//! Show the panes and agent counts of a session

use std::io::Write;

use anyhow::Result;
use panepool_core::{OutputFormat, SessionInspector, SessionName, StatusReport};

use super::{print_json, CommandContext};

#[derive(Debug, Clone)]
pub struct StatusOptions {
    pub session: SessionName,
    pub format: OutputFormat,
}

fn print_report(out: &mut impl Write, report: &StatusReport) -> Result<()> {
    writeln!(out, "Session: {}", report.session)?;
    writeln!(out, "Directory: {}", report.working_directory.display())?;
    writeln!(out)?;
    writeln!(out, "{:<6}  {:<7}  {:<24}  {:<12}  SIZE", "ID", "PANE", "TITLE", "COMMAND")?;
    for pane in &report.panes {
        writeln!(
            out,
            "{:<6}  {:<7}  {:<24}  {:<12}  {}x{}",
            pane.id.as_str(),
            format!("{}.{}", pane.window_index, pane.index),
            pane.title,
            pane.current_command,
            pane.width,
            pane.height
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Agents: cc={} cod={} gmi={} ({} panes total)",
        report.agents.cc,
        report.agents.cod,
        report.agents.gmi,
        report.panes.len()
    )?;
    Ok(())
}

pub async fn run(ctx: &CommandContext, options: &StatusOptions, out: &mut impl Write) -> Result<()> {
    let report = SessionInspector::new(ctx.mux())
        .status(&options.session)
        .await?;

    if options.format.is_json() {
        print_json(out, "status-response", "single", &report)
    } else {
        print_report(out, &report)
    }
}

pub async fn run_with_options(options: &StatusOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
