//! Make sure tmux is installed before any session work.

use std::process::Stdio;

use anyhow::{Context, Result};
use panepool_core::{Confirm, TmuxCli};
use tracing::{info, warn};

use crate::cli::{is_terminal, StdinConfirm};

/// A package-manager invocation that installs tmux.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl InstallPlan {
    fn display(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const BREW: InstallPlan = InstallPlan {
    program: "brew",
    args: &["install", "tmux"],
};

const LINUX_PLANS: &[InstallPlan] = &[
    InstallPlan {
        program: "sudo",
        args: &["apt-get", "install", "-y", "tmux"],
    },
    InstallPlan {
        program: "sudo",
        args: &["dnf", "install", "-y", "tmux"],
    },
    InstallPlan {
        program: "sudo",
        args: &["pacman", "-S", "--noconfirm", "tmux"],
    },
];

/// Pick an installer for `os`. `available` says whether a package manager
/// binary is on `PATH`.
fn install_plan(os: &str, available: impl Fn(&str) -> bool) -> Option<InstallPlan> {
    match os {
        "macos" => available("brew").then_some(BREW),
        "linux" => LINUX_PLANS
            .iter()
            .find(|plan| plan.args.first().is_some_and(|manager| available(*manager)))
            .cloned(),
        _ => None,
    }
}

async fn run_install(plan: &InstallPlan) -> Result<()> {
    info!(command = %plan.display(), "installing tmux");
    let status = tokio::process::Command::new(plan.program)
        .args(plan.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to run {}", plan.display()))?;
    if !status.success() {
        anyhow::bail!("'{}' exited with {status}", plan.display());
    }
    Ok(())
}

/// Locate tmux, offering to install it when missing on an interactive
/// terminal.
///
/// # Errors
///
/// `DependencyMissing` when tmux is absent and cannot be installed here.
pub async fn ensure_tmux(binary: &str, inside_client: bool) -> Result<TmuxCli> {
    let missing = match TmuxCli::locate(binary, inside_client) {
        Ok(tmux) => return Ok(tmux),
        Err(e) => e,
    };

    if !is_terminal() {
        return Err(missing.into());
    }
    let Some(plan) = install_plan(std::env::consts::OS, |name| which::which(name).is_ok())
    else {
        return Err(missing.into());
    };

    let prompt = format!("tmux is not installed. Run '{}' now?", plan.display());
    if !StdinConfirm.confirm(&prompt)? {
        return Err(missing.into());
    }

    if let Err(e) = run_install(&plan).await {
        warn!(error = %e, "tmux install failed");
        return Err(missing.into());
    }
    Ok(TmuxCli::locate(binary, inside_client)?)
}
