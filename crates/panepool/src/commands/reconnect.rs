//! Attach to a session, offering to recreate it when it is gone

use std::io::Write;

use anyhow::Result;
use panepool_core::{Error, SessionName, SessionRegistry};

use super::{create::ensure_session, CommandContext};

#[derive(Debug, Clone)]
pub struct ReconnectOptions {
    pub session: SessionName,
}

pub async fn run(
    ctx: &CommandContext,
    options: &ReconnectOptions,
    out: &mut impl Write,
) -> Result<()> {
    let registry = SessionRegistry::new(ctx.mux());

    if registry.exists(&options.session).await? {
        return ctx.attach(&options.session, false, out).await;
    }

    writeln!(out, "Session '{}' not found.", options.session)?;
    let sessions = registry.list().await?;
    if sessions.is_empty() {
        writeln!(out, "No tmux sessions are running.")?;
    } else {
        writeln!(out, "Available sessions:")?;
        for summary in &sessions {
            writeln!(out, "  {}", summary.name)?;
        }
    }

    if !ctx.is_terminal() {
        return Err(Error::session_not_found(options.session.as_str()).into());
    }

    let prompt = format!(
        "Create '{}' with {} panes?",
        options.session, ctx.config.default_panes
    );
    if !ctx.confirm().confirm(&prompt)? {
        return Err(Error::session_not_found(options.session.as_str()).into());
    }

    let (handle, count) = ensure_session(ctx, &options.session, ctx.config.default_panes).await?;
    writeln!(
        out,
        "Created session '{}' with {count} panes in {}",
        handle.name,
        handle.workdir.display()
    )?;
    ctx.attach(&options.session, false, out).await
}

pub async fn run_with_options(options: &ReconnectOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc};

    use panepool_core::tmux::testing::{Call, FakeMultiplexer};

    use super::*;
    use crate::commands::test_support::{context, name, text};

    fn not_found(result: &Result<()>) -> bool {
        result
            .as_ref()
            .err()
            .and_then(|e| e.downcast_ref::<Error>())
            .is_some_and(Error::is_not_found)
    }

    #[tokio::test]
    async fn test_missing_session_without_terminal_lists_and_fails() {
        let fake = Arc::new(FakeMultiplexer::new());
        fake.seed_session("alpha", Path::new("/w/alpha"), 1);
        fake.seed_session("beta", Path::new("/w/beta"), 1);
        let base = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let ctx = context(&fake, base.path(), true);
        let options = ReconnectOptions {
            session: name("ghost"),
        };

        let mut out = Vec::new();
        let result = run(&ctx, &options, &mut out).await;

        assert!(not_found(&result));
        let out = text(out);
        assert!(out.contains("Session 'ghost' not found."));
        assert!(out.contains("Available sessions:\n  alpha\n  beta\n"));
        assert!(!fake.has("ghost"));
    }

    #[tokio::test]
    async fn test_declined_recreate_is_not_found() {
        let fake = Arc::new(FakeMultiplexer::new());
        let base = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let ctx = context(&fake, base.path(), false).with_terminal(true, false);
        let options = ReconnectOptions {
            session: name("ghost"),
        };

        let mut out = Vec::new();
        let result = run(&ctx, &options, &mut out).await;

        assert!(not_found(&result));
        assert!(text(out).contains("No tmux sessions are running."));
        assert!(!fake.has("ghost"));
    }

    #[tokio::test]
    async fn test_accepted_recreate_builds_and_attaches() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        let base = tempfile::tempdir()?;
        let ctx = context(&fake, base.path(), true).with_terminal(true, false);
        let options = ReconnectOptions {
            session: name("proj"),
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        assert_eq!(fake.pane_count("proj"), ctx.config.default_panes as usize);
        assert!(text(out).contains("Created session 'proj'"));
        assert!(fake.calls().contains(&Call::Attach("proj".to_string())));
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_session_attaches_directly() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        fake.seed_session("proj", Path::new("/w/proj"), 2);
        let ctx = context(&fake, Path::new("/projects"), false).with_terminal(false, true);
        let options = ReconnectOptions {
            session: name("proj"),
        };

        run(&ctx, &options, &mut Vec::new()).await?;

        assert!(fake.calls().contains(&Call::Attach("proj".to_string())));
        Ok(())
    }
}
