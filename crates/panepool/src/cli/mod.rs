//! CLI plumbing: argument definitions, parsing helpers, terminal detection

pub mod args;
pub mod commands;
pub mod handlers;
pub mod setup;

use std::io::{self, BufRead, Write};

use panepool_core::{Confirm, Error};

/// Check if we're running inside a tmux client
pub fn is_inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some_and(|v| !v.is_empty())
}

/// Check if we're running in a terminal (TTY)
/// Uses `std::io::IsTerminal` (Rust 1.70+)
pub fn is_terminal() -> bool {
    use std::io::IsTerminal;
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Asks on stdout and reads `y`/`yes` from stdin. Refuses to block when
/// stdin is not a terminal.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> panepool_core::Result<bool> {
        use std::io::IsTerminal;
        if !io::stdin().is_terminal() {
            return Err(Error::non_interactive(prompt));
        }

        let mut stdout = io::stdout();
        write!(stdout, "{prompt} [y/N] ")?;
        stdout.flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        let response = response.trim().to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}
