//! Injectable confirmation providers.
//!
//! The pipeline never reads stdin directly; it asks a
//! [ConfirmationProvider], so non-interactive runs and tests work
//! without a terminal.

use crate::error::Result;
use std::io::{self, Write};

/// Asks the user (or pretends to) before mutating actions
pub trait ConfirmationProvider: Send + Sync {
    /// Returns true when the action should proceed
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interactive y/N prompt on the terminal
pub struct TerminalConfirmation;

impl ConfirmationProvider for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("\n{} (y/N): ", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let response = input.trim().to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}

/// Approves everything; backs `--force` mode
pub struct AutoApprove;

impl ConfirmationProvider for AutoApprove {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Fixed answer for tests
pub struct ScriptedConfirmation {
    answer: bool,
}

impl ScriptedConfirmation {
    pub fn new(answer: bool) -> Self {
        ScriptedConfirmation { answer }
    }
}

impl ConfirmationProvider for ScriptedConfirmation {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_approve_always_true() {
        assert!(AutoApprove.confirm("Create this PR?").unwrap());
    }

    #[test]
    fn test_scripted_confirmation() {
        assert!(ScriptedConfirmation::new(true).confirm("?").unwrap());
        assert!(!ScriptedConfirmation::new(false).confirm("?").unwrap());
    }
}
