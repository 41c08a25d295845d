use itertools::Itertools;

/// Result of comparing one submission against its target word
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grade {
    Correct,
    /// Holds the normalized submission
    Incorrect {
        submitted: String,
    },
    /// Nothing was typed. Counted as correct since the user may be writing by hand.
    Unanswered,
}

impl Grade {
    pub fn counts_as_correct(&self) -> bool {
        !matches!(self, Grade::Incorrect { .. })
    }
}

/// Trimmed and lower-cased form used for comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn grade(submission: &str, target: &str) -> Grade {
    let submitted = normalize(submission);

    if submitted == target.to_lowercase() {
        Grade::Correct
    } else if submitted.is_empty() {
        Grade::Unanswered
    } else {
        Grade::Incorrect { submitted }
    }
}

/// Upper-cased letters separated by spaces, e.g. `cat` -> `C A T`.
pub fn spell_out(word: &str) -> String {
    word.chars().flat_map(char::to_uppercase).join(" ")
}

pub fn reinforcement(word: &str) -> String {
    format!("The correct spelling is {}", spell_out(word))
}
