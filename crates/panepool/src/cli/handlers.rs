//! CLI command handlers that bridge between `clap` and internal logic
//!
//! Every handler validates its arguments into an options struct before the
//! command touches configuration or tmux.

use std::process;

use anyhow::Result;
use clap::ArgMatches;
use panepool_core::{AgentCounts, AgentType, OutputFormat, PaneSelector, RouteFilter};

use crate::{
    cli::{args, commands::build_cli, setup::init_tracing},
    commands::{
        add, broadcast, copy_output, create, interrupt, kill, list, quick_setup, reconnect,
        save_outputs, send, spawn, status, view, zoom,
    },
};

/// Format an error for user display (no stack traces)
pub fn format_error(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            return format!("{msg}\nCause: {source_msg}");
        }
    }
    msg
}

fn format_of(sub_m: &ArgMatches) -> OutputFormat {
    OutputFormat::from_json_flag(sub_m.get_flag("json"))
}

pub async fn handle_create(sub_m: &ArgMatches) -> Result<()> {
    let options = create::CreateOptions {
        session: args::session(sub_m, "session")?,
        panes: args::positive(sub_m, "panes")?,
        no_attach: sub_m.get_flag("no-attach"),
    };
    create::run_with_options(&options).await
}

pub async fn handle_spawn(sub_m: &ArgMatches) -> Result<()> {
    let options = spawn::SpawnOptions {
        session: args::session(sub_m, "session")?,
        counts: args::agent_counts(sub_m, AgentCounts::default())?,
        no_attach: sub_m.get_flag("no-attach"),
    };
    spawn::run_with_options(&options).await
}

pub async fn handle_add(sub_m: &ArgMatches) -> Result<()> {
    let options = add::AddOptions {
        session: args::session(sub_m, "session")?,
        counts: args::agent_counts(sub_m, AgentCounts::default())?,
        format: format_of(sub_m),
    };
    add::run_with_options(&options).await
}

pub async fn handle_reconnect(sub_m: &ArgMatches) -> Result<()> {
    let options = reconnect::ReconnectOptions {
        session: args::session(sub_m, "session")?,
    };
    reconnect::run_with_options(&options).await
}

pub async fn handle_list(sub_m: &ArgMatches) -> Result<()> {
    let options = list::ListOptions {
        format: format_of(sub_m),
    };
    list::run_with_options(&options).await
}

pub async fn handle_status(sub_m: &ArgMatches) -> Result<()> {
    let options = status::StatusOptions {
        session: args::session(sub_m, "session")?,
        format: format_of(sub_m),
    };
    status::run_with_options(&options).await
}

pub async fn handle_view(sub_m: &ArgMatches) -> Result<()> {
    let options = view::ViewOptions {
        session: args::session(sub_m, "session")?,
        no_attach: sub_m.get_flag("no-attach"),
    };
    view::run_with_options(&options).await
}

/// `--cc`, `--cod`, `--gmi` are mutually exclusive in the clap definition.
fn agent_filter(sub_m: &ArgMatches) -> Option<AgentType> {
    [AgentType::Cc, AgentType::Cod, AgentType::Gmi]
        .into_iter()
        .find(|agent_type| sub_m.get_flag(agent_type.as_ref()))
}

pub async fn handle_send(sub_m: &ArgMatches) -> Result<()> {
    let session = args::session(sub_m, "session")?;
    let command = args::command_text(sub_m, "command")?;
    let options = send::SendOptions {
        session,
        filter: RouteFilter::new(sub_m.get_flag("skip-first"), agent_filter(sub_m)),
        command,
        format: format_of(sub_m),
    };
    send::run_with_options(&options).await
}

pub async fn handle_interrupt(sub_m: &ArgMatches) -> Result<()> {
    let options = interrupt::InterruptOptions {
        session: args::session(sub_m, "session")?,
        format: format_of(sub_m),
    };
    interrupt::run_with_options(&options).await
}

pub async fn handle_kill(sub_m: &ArgMatches) -> Result<()> {
    let options = kill::KillOptions {
        session: args::session(sub_m, "session")?,
        force: sub_m.get_flag("force"),
    };
    kill::run_with_options(&options).await
}

pub async fn handle_copy_output(sub_m: &ArgMatches) -> Result<()> {
    let session = args::session(sub_m, "session")?;
    let pane = sub_m
        .get_one::<String>("pane")
        .map_or(Ok(PaneSelector::Index(0)), |raw| raw.parse())?;
    let options = copy_output::CopyOutputOptions {
        session,
        pane,
        lines: args::positive(sub_m, "lines")?,
    };
    copy_output::run_with_options(&options).await
}

pub async fn handle_save_outputs(sub_m: &ArgMatches) -> Result<()> {
    let options = save_outputs::SaveOutputsOptions {
        session: args::session(sub_m, "session")?,
        dir: sub_m
            .get_one::<String>("dir")
            .map(|d| panepool_core::config::expand_home(d)),
        format: format_of(sub_m),
    };
    save_outputs::run_with_options(&options).await
}

pub async fn handle_zoom(sub_m: &ArgMatches) -> Result<()> {
    let session = args::session(sub_m, "session")?;
    let target = sub_m
        .get_one::<String>("target")
        .map(String::as_str)
        .unwrap_or_default()
        .parse::<panepool_core::ZoomTarget>()?;
    let options = zoom::ZoomOptions {
        session,
        target,
        no_attach: sub_m.get_flag("no-attach"),
    };
    zoom::run_with_options(&options).await
}

pub async fn handle_broadcast(sub_m: &ArgMatches) -> Result<()> {
    let session = args::session(sub_m, "session")?;
    let target = sub_m
        .get_one::<String>("target")
        .map(String::as_str)
        .unwrap_or_default()
        .parse::<panepool_core::BroadcastTarget>()?;
    let prompt = args::command_text(sub_m, "prompt")?;
    let options = broadcast::BroadcastOptions {
        session,
        target,
        prompt,
        format: format_of(sub_m),
    };
    broadcast::run_with_options(&options).await
}

pub async fn handle_quick_setup(sub_m: &ArgMatches) -> Result<()> {
    let options = quick_setup::QuickSetupOptions {
        project: args::session(sub_m, "project")?,
        counts: args::agent_counts(sub_m, quick_setup::DEFAULT_COUNTS)?,
        no_attach: sub_m.get_flag("no-attach"),
    };
    quick_setup::run_with_options(&options).await
}

async fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("create", sub_m)) => handle_create(sub_m).await,
        Some(("spawn", sub_m)) => handle_spawn(sub_m).await,
        Some(("add", sub_m)) => handle_add(sub_m).await,
        Some(("reconnect", sub_m)) => handle_reconnect(sub_m).await,
        Some(("list", sub_m)) => handle_list(sub_m).await,
        Some(("status", sub_m)) => handle_status(sub_m).await,
        Some(("view", sub_m)) => handle_view(sub_m).await,
        Some(("send", sub_m)) => handle_send(sub_m).await,
        Some(("interrupt", sub_m)) => handle_interrupt(sub_m).await,
        Some(("kill", sub_m)) => handle_kill(sub_m).await,
        Some(("copy-output", sub_m)) => handle_copy_output(sub_m).await,
        Some(("save-outputs", sub_m)) => handle_save_outputs(sub_m).await,
        Some(("zoom", sub_m)) => handle_zoom(sub_m).await,
        Some(("broadcast", sub_m)) => handle_broadcast(sub_m).await,
        Some(("quick-setup", sub_m)) => handle_quick_setup(sub_m).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

/// Rendered usage line of one subcommand, e.g. `Usage: panepool send ...`.
fn subcommand_usage(name: &str) -> Option<String> {
    let mut cli = build_cli();
    cli.build();
    cli.find_subcommand_mut(name)
        .map(|sub| sub.render_usage().to_string())
}

/// Print a clap parse outcome and pick the exit code for it.
///
/// `--help` and `--version` arrive as errors but are not failures. Tracing is
/// not initialized yet, so a failed write is reported on stderr directly.
fn report_parse_error(e: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    let should_exit_zero = matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if let Err(print_err) = e.print() {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: failed to print usage: {print_err}");
            eprintln!("{}", e.render());
        }
        return 1;
    }
    if should_exit_zero {
        0
    } else {
        1
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = build_cli();

    let matches = match cli.try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            let code = report_parse_error(&e);
            #[allow(clippy::exit)]
            process::exit(code);
        }
    };

    init_tracing(matches.get_flag("verbose"))?;

    let result = dispatch(&matches).await;

    if let Err(err) = &result {
        let is_usage = err
            .downcast_ref::<panepool_core::Error>()
            .is_some_and(panepool_core::Error::is_usage);
        if let (true, Some((name, _))) = (is_usage, matches.subcommand()) {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {}", format_error(err));
                if let Some(usage) = subcommand_usage(name) {
                    eprintln!("{usage}");
                }
            }
            #[allow(clippy::exit)]
            process::exit(1);
        }
    }

    result
}
