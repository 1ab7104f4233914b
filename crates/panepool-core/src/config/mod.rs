//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `<config_dir>/panepool/config.toml`
//! 3. Environment variables: `PANEPOOL_*`
//!
//! # Example Config
//!
//! ```toml
//! projects_base = "~/work"
//! default_panes = 6
//!
//! [agents]
//! cc = "claude --dangerously-skip-permissions"
//! ```
//!
//! # Module Structure
//!
//! - `types`: configuration structures and built-in defaults
//! - `load`: file, environment and merge layering
//! - `validate`: value checks run after every layer is applied

mod load;
mod types;
mod validate;

pub use load::{
    expand_home, global_config_path, load_config, load_toml_file, ENV_LOG_DIR, ENV_PROJECTS_BASE,
    ENV_TMUX,
};
pub use types::{AgentCommands, AgentCommandsLayer, Config, ConfigLayer};
