//! Create a project directory, init git, and spawn agents

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use panepool_core::{AgentCounts, SessionName};
use tracing::{info, warn};

use super::{
    spawn::{print_assignments, spawn_agents, SpawnOptions},
    CommandContext,
};

/// Counts used when none are given.
pub const DEFAULT_COUNTS: AgentCounts = AgentCounts::new(2, 2, 0);

#[derive(Debug, Clone)]
pub struct QuickSetupOptions {
    pub project: SessionName,
    pub counts: AgentCounts,
    pub no_attach: bool,
}

/// `git init` unless `dir` already has a `.git`. A missing git binary is
/// logged and skipped.
async fn init_git(dir: &Path) -> Result<()> {
    if dir.join(".git").exists() {
        return Ok(());
    }
    let Ok(git) = which::which("git") else {
        warn!(dir = %dir.display(), "git not found; skipping repository init");
        return Ok(());
    };

    let output = tokio::process::Command::new(git)
        .arg("init")
        .arg("--quiet")
        .current_dir(dir)
        .output()
        .await
        .context("Failed to run git init")?;
    if !output.status.success() {
        anyhow::bail!(
            "git init failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    info!(dir = %dir.display(), "initialized git repository");
    Ok(())
}

pub async fn run(
    ctx: &CommandContext,
    options: &QuickSetupOptions,
    out: &mut impl Write,
) -> Result<()> {
    let dir = ctx.config.session_dir(&options.project);

    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create project directory {}", dir.display()))?;
    init_git(&dir).await?;

    let spawn = SpawnOptions {
        session: options.project.clone(),
        counts: options.counts,
        no_attach: options.no_attach,
    };
    let (handle, assignments) = spawn_agents(ctx, &spawn).await?;
    writeln!(out, "Project ready at {}", handle.workdir.display())?;
    print_assignments(out, &options.project, &assignments)?;
    ctx.attach(&options.project, options.no_attach, out).await
}

pub async fn run_with_options(options: &QuickSetupOptions) -> Result<()> {
    let ctx = CommandContext::connect().await?;
    run(&ctx, options, &mut std::io::stdout()).await
}
