//! User confirmation before irreversible actions.

/// Asks the user to confirm a destructive action.
///
/// Deletes are only issued after `confirm` returns true.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt with the same value (`--yes` flags, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
