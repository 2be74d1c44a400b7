/// Aggregated answer progress for a quiz, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// "N questions remaining", the confirmation prompt wording.
    #[must_use]
    pub fn remaining_label(&self) -> String {
        remaining_label(self.remaining)
    }
}

#[must_use]
pub fn remaining_label(remaining: usize) -> String {
    format!("{remaining} questions remaining")
}
