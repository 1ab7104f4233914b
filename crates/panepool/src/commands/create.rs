//! Ensure a session with at least N panes, then attach

use std::io::Write;

use anyhow::Result;
use panepool_core::{PaneAllocator, SessionHandle, SessionName, SessionRegistry};

use super::CommandContext;

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub session: SessionName,
    /// `None` uses `default_panes` from config
    pub panes: Option<u32>,
    pub no_attach: bool,
}

/// Create the session if missing and grow its first window to `panes`.
///
/// New panes open in the session's own directory, which for an existing
/// session is wherever it was started.
pub async fn ensure_session(
    ctx: &CommandContext,
    session: &SessionName,
    panes: u32,
) -> Result<(SessionHandle, usize)> {
    let handle = SessionRegistry::new(ctx.mux())
        .create(session, &ctx.config.session_dir(session))
        .await?;
    let allocator = PaneAllocator::new(ctx.mux());
    let window = allocator.first_window(session).await?;
    let count = allocator
        .reconcile(&window, &handle.workdir, panes as usize)
        .await?;
    Ok((handle, count))
}

pub async fn run(ctx: &CommandContext, options: &CreateOptions, out: &mut impl Write) -> Result<()> {
    let panes = options.panes.unwrap_or(ctx.config.default_panes);

    let (handle, count) = ensure_session(ctx, &options.session, panes).await?;
    let verb = if handle.created { "Created" } else { "Using existing" };
    writeln!(
        out,
        "{verb} session '{}' with {count} panes in {}",
        handle.name,
        handle.workdir.display()
    )?;

    ctx.attach(&options.session, options.no_attach, out).await
}

pub async fn run_with_options(options: &CreateOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc};

    use panepool_core::tmux::testing::{Call, FakeMultiplexer};

    use super::*;
    use crate::commands::test_support::{context, name, text};

    #[tokio::test]
    async fn test_create_new_session_grows_to_requested_panes() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        let base = tempfile::tempdir()?;
        let ctx = context(&fake, base.path(), true);
        let options = CreateOptions {
            session: name("proj"),
            panes: Some(3),
            no_attach: false,
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        assert_eq!(fake.pane_count("proj"), 3);
        assert!(base.path().join("proj").is_dir());
        let out = text(out);
        assert!(out.contains("Created session 'proj' with 3 panes"));
        assert!(out.contains("tmux attach -t proj"));
        assert!(!fake.calls().contains(&Call::Attach("proj".to_string())));
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_session_splits_in_its_own_directory() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        fake.seed_session("proj", Path::new("/home/u/code/proj"), 1);
        let base = tempfile::tempdir()?;
        let ctx = context(&fake, base.path(), true);
        let options = CreateOptions {
            session: name("proj"),
            panes: Some(2),
            no_attach: true,
        };

        let mut out = Vec::new();
        run(&ctx, &options, &mut out).await?;

        let splits: Vec<_> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SplitWindow { workdir, .. } => Some(workdir),
                _ => None,
            })
            .collect();
        assert_eq!(splits, vec![Path::new("/home/u/code/proj").to_path_buf()]);
        assert!(!base.path().join("proj").exists());
        assert!(text(out).contains("Using existing session 'proj' with 2 panes in /home/u/code/proj"));
        Ok(())
    }

    #[tokio::test]
    async fn test_attach_with_terminal() -> Result<()> {
        let fake = Arc::new(FakeMultiplexer::new());
        let base = tempfile::tempdir()?;
        let ctx = context(&fake, base.path(), true).with_terminal(true, false);
        let options = CreateOptions {
            session: name("proj"),
            panes: None,
            no_attach: false,
        };

        run(&ctx, &options, &mut Vec::new()).await?;

        assert!(fake.calls().contains(&Call::Attach("proj".to_string())));
        Ok(())
    }
}
