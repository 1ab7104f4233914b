//! Send a command to the panes of a session

use std::io::Write;

use anyhow::Result;
use panepool_core::{CommandRouter, OutputFormat, RouteFilter, RouteOutcome, SessionName};

use super::{print_json, CommandContext};

#[derive(Debug, Clone)]
pub struct SendOptions {
    pub session: SessionName,
    pub filter: RouteFilter,
    pub command: String,
    pub format: OutputFormat,
}

/// Human summary shared by send, broadcast and interrupt.
pub fn report(
    out: &mut impl Write,
    outcome: &RouteOutcome,
    verb: &str,
    format: OutputFormat,
) -> Result<()> {
    if format.is_json() {
        return print_json(out, "route-response", "single", outcome);
    }
    if outcome.is_empty() {
        writeln!(out, "No matching panes in session '{}'", outcome.session)?;
    } else {
        writeln!(out, "{verb} {} panes", outcome.matched_count())?;
    }
    Ok(())
}

pub async fn run(ctx: &CommandContext, options: &SendOptions, out: &mut impl Write) -> Result<()> {
    let outcome = CommandRouter::new(ctx.mux())
        .send(&options.session, options.filter, &options.command)
        .await?;
    report(out, &outcome, "Sent to", options.format)
}

pub async fn run_with_options(options: &SendOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc};

    use panepool_core::{tmux::testing::FakeMultiplexer, AgentType};

    use super::*;
    use crate::commands::test_support::{context, name, text};

    #[tokio::test]
    async fn test_send_to_one_agent_type() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        let ids = fake.seed_session("proj", Path::new("/w"), 3);
        fake.seed_title(&ids[1], "proj__cc_1");
        fake.seed_title(&ids[2], "proj__cod_1");
        let ctx = context(&fake, Path::new("/projects"), true);
        let options = SendOptions {
            session: name("proj"),
            filter: RouteFilter::new(false, Some(AgentType::Cod)),
            command: "git status".to_string(),
            format: OutputFormat::Human,
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        assert_eq!(text(out), "Sent to 1 panes\n");
        assert_eq!(fake.sent_text(&ids[2]), vec!["git status".to_string()]);
        assert!(fake.sent_text(&ids[1]).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_with_no_match_reports_it() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        fake.seed_session("proj", Path::new("/w"), 1);
        let ctx = context(&fake, Path::new("/projects"), true);
        let options = SendOptions {
            session: name("proj"),
            filter: RouteFilter::new(false, Some(AgentType::Gmi)),
            command: "ls".to_string(),
            format: OutputFormat::Human,
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        assert_eq!(text(out), "No matching panes in session 'proj'\n");
        Ok(())
    }
}
