//! Yes/no confirmation seam.
//!
//! Destructive operations take a `&dyn Confirm` instead of reading stdin, so
//! the binary decides how prompts are answered and tests answer them
//! directly.

use crate::Result;

pub trait Confirm {
    /// Ask `prompt`; `Ok(true)` means proceed.
    ///
    /// # Errors
    ///
    /// Implementations fail when no answer can be obtained (for example,
    /// no terminal is attached).
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Answers every prompt with the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
