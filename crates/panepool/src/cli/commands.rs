//! CLI command definitions using `clap`

use clap::{Arg, ArgAction, ArgGroup, Command as ClapCommand};

pub fn after_help_text(examples: &[&str]) -> String {
    let mut text = String::from("EXAMPLES:\n");
    for example in examples {
        text.push_str("  ");
        text.push_str(example);
        text.push('\n');
    }
    text
}

fn session_arg() -> Arg {
    Arg::new("session")
        .required(true)
        .help("tmux session name (must not contain ':' or '.')")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn no_attach_arg() -> Arg {
    Arg::new("no-attach")
        .long("no-attach")
        .action(ArgAction::SetTrue)
        .help("Do not attach to the session afterwards")
}

fn count_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).allow_negative_numbers(true).help(help)
}

fn agent_count_args(cmd: ClapCommand, required: bool) -> ClapCommand {
    cmd.arg(count_arg("cc", "Number of Claude Code agents").required(required))
        .arg(count_arg("cod", "Number of Codex agents").required(required))
        .arg(count_arg("gmi", "Number of Gemini agents (default 0)"))
}

pub fn cmd_create() -> ClapCommand {
    ClapCommand::new("create")
        .about("Create a session (if missing) with at least N panes, then attach")
        .arg(session_arg())
        .arg(count_arg("panes", "Pane count (default from config, 10)"))
        .arg(no_attach_arg())
        .after_help(after_help_text(&[
            "panepool create myproj          Session with 10 panes in ~/Developer/myproj",
            "panepool create myproj 4        Session with at least 4 panes",
        ]))
}

pub fn cmd_spawn() -> ClapCommand {
    let cmd = ClapCommand::new("spawn")
        .about("Create a session and launch agents into its panes, then attach")
        .arg(session_arg())
        .arg(no_attach_arg())
        .after_help(after_help_text(&[
            "panepool spawn myproj 2 2       Two Claude Code and two Codex agents",
            "panepool spawn myproj 0 0 3     Three Gemini agents",
        ]));
    agent_count_args(cmd, true)
}

pub fn cmd_add() -> ClapCommand {
    let cmd = ClapCommand::new("add")
        .about("Append new agent panes to an existing session")
        .arg(session_arg())
        .arg(json_arg())
        .after_help(after_help_text(&[
            "panepool add myproj 1 0         One more Claude Code agent",
        ]));
    agent_count_args(cmd, true)
}

pub fn cmd_reconnect() -> ClapCommand {
    ClapCommand::new("reconnect")
        .about("Attach to a session, offering to create it when missing")
        .arg(session_arg())
}

pub fn cmd_list() -> ClapCommand {
    ClapCommand::new("list")
        .visible_alias("ls")
        .about("List tmux sessions")
        .arg(json_arg())
}

pub fn cmd_status() -> ClapCommand {
    ClapCommand::new("status")
        .about("Show panes and agent counts of a session")
        .arg(session_arg())
        .arg(json_arg())
}

pub fn cmd_view() -> ClapCommand {
    ClapCommand::new("view")
        .about("Un-zoom and tile every window, then attach")
        .arg(session_arg())
        .arg(no_attach_arg())
}

pub fn cmd_send() -> ClapCommand {
    ClapCommand::new("send")
        .about("Send a command to panes of a session")
        .arg(
            Arg::new("skip-first")
                .short('s')
                .long("skip-first")
                .action(ArgAction::SetTrue)
                .help("Skip the first pane (the user pane)"),
        )
        .arg(
            Arg::new("cc")
                .long("cc")
                .action(ArgAction::SetTrue)
                .help("Only Claude Code panes"),
        )
        .arg(
            Arg::new("cod")
                .long("cod")
                .action(ArgAction::SetTrue)
                .help("Only Codex panes"),
        )
        .arg(
            Arg::new("gmi")
                .long("gmi")
                .action(ArgAction::SetTrue)
                .help("Only Gemini panes"),
        )
        .group(ArgGroup::new("agent-filter").args(["cc", "cod", "gmi"]))
        .arg(json_arg())
        .arg(session_arg())
        .arg(
            Arg::new("command")
                .required(true)
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Command text; words are joined with spaces"),
        )
        .after_help(after_help_text(&[
            "panepool send --cc myproj git status     Only Claude Code panes",
            "panepool send -s myproj make test        Every pane except the first",
        ]))
}

pub fn cmd_interrupt() -> ClapCommand {
    ClapCommand::new("interrupt")
        .about("Send Ctrl-C to every agent pane")
        .arg(session_arg())
        .arg(json_arg())
}

pub fn cmd_kill() -> ClapCommand {
    ClapCommand::new("kill")
        .about("Kill a session and every process in it")
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Skip the confirmation prompt"),
        )
        .arg(session_arg())
}

pub fn cmd_copy_output() -> ClapCommand {
    ClapCommand::new("copy-output")
        .about("Copy a pane's recent output to the clipboard")
        .arg(session_arg())
        .arg(Arg::new("pane").help("Pane index in the first window, or %id (default 0)"))
        .arg(count_arg("lines", "Lines of scrollback (default from config, 500)"))
}

pub fn cmd_save_outputs() -> ClapCommand {
    ClapCommand::new("save-outputs")
        .about("Save every pane's scrollback to log files")
        .arg(session_arg())
        .arg(Arg::new("dir").help("Output directory (default from config, ~/tmux-logs)"))
        .arg(json_arg())
}

pub fn cmd_zoom() -> ClapCommand {
    ClapCommand::new("zoom")
        .about("Zoom a pane by index or the first pane of an agent type, then attach")
        .arg(session_arg())
        .arg(
            Arg::new("target")
                .required(true)
                .help("Pane index in the first window, or cc, cod, gmi"),
        )
        .arg(no_attach_arg())
}

pub fn cmd_broadcast() -> ClapCommand {
    ClapCommand::new("broadcast")
        .about("Send a prompt to every pane of an agent type, or to all agents")
        .arg(session_arg())
        .arg(
            Arg::new("target")
                .required(true)
                .help("cc, cod, gmi or all"),
        )
        .arg(
            Arg::new("prompt")
                .required(true)
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Prompt text; words are joined with spaces"),
        )
        .arg(json_arg())
}

pub fn cmd_quick_setup() -> ClapCommand {
    let cmd = ClapCommand::new("quick-setup")
        .about("Create a project directory, init git if needed, and spawn agents")
        .arg(
            Arg::new("project")
                .required(true)
                .help("Project (and session) name"),
        )
        .arg(no_attach_arg())
        .after_help(after_help_text(&[
            "panepool quick-setup myproj           Two Claude Code and two Codex agents",
            "panepool quick-setup myproj 1 1 1     One of each",
            "",
            "Counts default to 2 Claude Code, 2 Codex and 0 Gemini agents.",
        ]));
    agent_count_args(cmd, false)
}

pub fn build_cli() -> ClapCommand {
    ClapCommand::new("panepool")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pools of AI agent panes inside tmux sessions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(cmd_create())
        .subcommand(cmd_spawn())
        .subcommand(cmd_add())
        .subcommand(cmd_reconnect())
        .subcommand(cmd_list())
        .subcommand(cmd_status())
        .subcommand(cmd_view())
        .subcommand(cmd_send())
        .subcommand(cmd_interrupt())
        .subcommand(cmd_kill())
        .subcommand(cmd_copy_output())
        .subcommand(cmd_save_outputs())
        .subcommand(cmd_zoom())
        .subcommand(cmd_broadcast())
        .subcommand(cmd_quick_setup())
}
