//! Configuration validation.

use super::types::Config;
use crate::{tag::AgentType, Error, Result};

impl Config {
    /// Validate merged values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a count is zero or the tmux binary or an
    /// agent command is empty.
    pub fn validate(&self) -> Result<()> {
        if self.default_panes == 0 {
            return Err(Error::invalid_config("default_panes must be at least 1"));
        }
        if self.capture_lines == 0 {
            return Err(Error::invalid_config("capture_lines must be at least 1"));
        }
        if self.copy_lines == 0 {
            return Err(Error::invalid_config("copy_lines must be at least 1"));
        }
        if self.tmux_binary.trim().is_empty() {
            return Err(Error::invalid_config("tmux_binary cannot be empty"));
        }
        AgentType::ALL.into_iter().try_for_each(|agent_type| {
            if self.agents.command(agent_type).trim().is_empty() {
                Err(Error::invalid_config(format!(
                    "agents.{agent_type} cannot be empty"
                )))
            } else {
                Ok(())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_default_panes_rejected() {
        let config = Config {
            default_panes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_agent_command_rejected() {
        let mut config = Config::default();
        config.agents.gmi = "  ".to_string();
        let err = config.validate().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Invalid configuration: agents.gmi cannot be empty")
        );
    }
}
