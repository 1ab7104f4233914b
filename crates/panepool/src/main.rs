//! Panepool CLI - pools of AI agent panes inside tmux sessions
//!
//! Binary name: `panepool`

use std::process;

mod bootstrap;
mod cli;
mod clipboard;
mod commands;

use cli::handlers::{format_error, run_cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_cli().await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {}", format_error(&err));
        }

        let code = err
            .downcast_ref::<panepool_core::Error>()
            .map_or(1, panepool_core::Error::exit_code);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}
