use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::grading::Grade;

pub type SessionId = u64;

/// Fixed waits of the grading cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// How long the user has to type each word
    pub answer_window: Duration,
    /// Gap between one word's reinforcement and the next word
    pub pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            answer_window: Duration::from_secs(5),
            pause: Duration::from_secs(3),
        }
    }
}

impl From<&Config> for Timing {
    fn from(cfg: &Config) -> Self {
        Self {
            answer_window: secs(cfg.answer_window_secs),
            pause: secs(cfg.pause_secs),
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Completed,
    Stopped,
}

/// Read-only view of the counters, published after every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub total: usize,
    pub position: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub running: bool,
}

impl SessionSnapshot {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.position)
    }
}

/// Worker-owned state of one session
#[derive(Debug, Clone)]
pub struct SessionState {
    words: Vec<String>,
    position: usize,
    correct: usize,
    incorrect: usize,
    missed: Vec<String>,
    running: bool,
}

impl SessionState {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            position: 0,
            correct: 0,
            incorrect: 0,
            missed: Vec::new(),
            running: true,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        if self.running {
            self.words.get(self.position).map(String::as_str)
        } else {
            None
        }
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.position
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.words.len()
    }

    pub fn missed(&self) -> &[String] {
        &self.missed
    }

    /// Applies the grade of the current word and advances past it.
    ///
    /// Every incorrect grade bumps the counter, but the missed list only
    /// takes a word once. Returns the word when it was newly added to that
    /// list.
    pub fn record(&mut self, grade: &Grade) -> Option<String> {
        let word = self.words.get(self.position)?.clone();
        self.position += 1;

        if grade.counts_as_correct() {
            self.correct += 1;
            return None;
        }

        self.incorrect += 1;
        if self.missed.contains(&word) {
            None
        } else {
            self.missed.push(word.clone());
            Some(word)
        }
    }

    pub fn finish(&mut self) -> SessionStatus {
        self.running = false;
        if self.is_complete() {
            SessionStatus::Completed
        } else {
            SessionStatus::Stopped
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            total: self.words.len(),
            position: self.position,
            correct: self.correct,
            incorrect: self.incorrect,
            running: self.running,
        }
    }
}

/// Summary handed back when a session ends
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub snapshot: SessionSnapshot,
    pub missed: Vec<String>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl SessionReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn accuracy(&self) -> Option<f64> {
        let graded = self.snapshot.correct + self.snapshot.incorrect;
        match graded {
            0 => None,
            n => Some(self.snapshot.correct as f64 * 100.0 / n as f64),
        }
    }
}

/// Status line published by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Listening { remaining: usize },
    AwaitingAnswer,
    Graded { word: String, grade: Grade },
    Completed,
    Stopped,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Listening { remaining } => write!(f, "🗣️ Listen... ({remaining} left)"),
            Message::AwaitingAnswer => write!(f, "✍️ Write or type the spelling..."),
            Message::Graded { word, grade } => match grade {
                Grade::Correct => write!(f, "✅ Correct! {word}"),
                Grade::Incorrect { submitted } => {
                    write!(f, "❌ Incorrect! You wrote '{submitted}'. Correct: {word}")
                }
                Grade::Unanswered => {
                    write!(f, "✅ Correct spelling: {word} (write it on paper?)")
                }
            },
            Message::Completed => write!(f, "🎉 All words done!"),
            Message::Stopped => write!(f, "⏹️ Practice stopped."),
        }
    }
}

impl From<SessionStatus> for Message {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Completed => Message::Completed,
            SessionStatus::Stopped => Message::Stopped,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEventKind {
    Started { total: usize },
    Message(Message),
    Definition(String),
    Progress(SessionSnapshot),
    /// A word entered the missed list for the first time
    Missed(String),
    Finished(SessionReport),
}

/// A publication from the controller, tagged with the session that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub kind: SessionEventKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn miss(s: &str) -> Grade {
        Grade::Incorrect {
            submitted: s.to_string(),
        }
    }

    #[test]
    fn new_state_starts_at_zero() {
        let state = SessionState::new(words(&["cat", "dog"]));
        let snap = state.snapshot();
        assert_eq!(snap.position, 0);
        assert_eq!(snap.correct, 0);
        assert_eq!(snap.incorrect, 0);
        assert_eq!(snap.remaining(), 2);
        assert!(snap.running);
        assert_eq!(state.current_word(), Some("cat"));
    }

    #[test]
    fn record_advances_and_counts() {
        let mut state = SessionState::new(words(&["cat", "dog", "owl"]));
        assert_eq!(state.record(&Grade::Correct), None);
        assert_eq!(state.record(&miss("dag")), Some("dog".to_string()));
        assert_eq!(state.record(&Grade::Unanswered), None);

        let snap = state.snapshot();
        assert_eq!(snap.position, 3);
        assert_eq!(snap.correct, 2);
        assert_eq!(snap.incorrect, 1);
        assert!(state.is_complete());
        assert_eq!(state.current_word(), None);
        assert_eq!(state.missed(), ["dog".to_string()]);
    }

    #[test]
    fn repeated_miss_counts_twice_but_lists_once() {
        let mut state = SessionState::new(words(&["their", "there", "their"]));
        assert_eq!(state.record(&miss("thier")), Some("their".to_string()));
        assert_eq!(state.record(&Grade::Correct), None);
        assert_eq!(state.record(&miss("thier")), None);

        assert_eq!(state.snapshot().incorrect, 2);
        assert_eq!(state.missed(), ["their".to_string()]);
    }

    #[test]
    fn counters_never_exceed_position() {
        let mut state = SessionState::new(words(&["a", "b", "c", "d"]));
        for grade in [Grade::Correct, miss("x"), Grade::Unanswered, miss("y")] {
            state.record(&grade);
            let snap = state.snapshot();
            assert!(snap.correct + snap.incorrect <= snap.position);
            assert!(snap.position <= snap.total);
        }
    }

    #[test]
    fn record_past_the_end_is_ignored() {
        let mut state = SessionState::new(words(&["a"]));
        state.record(&Grade::Correct);
        assert_eq!(state.record(&miss("b")), None);
        assert_eq!(state.snapshot().position, 1);
        assert_eq!(state.snapshot().incorrect, 0);
    }

    #[test]
    fn finish_reports_status() {
        let mut done = SessionState::new(words(&["a"]));
        done.record(&Grade::Correct);
        assert_eq!(done.finish(), SessionStatus::Completed);
        assert!(!done.snapshot().running);

        let mut cut = SessionState::new(words(&["a", "b"]));
        cut.record(&Grade::Correct);
        assert_eq!(cut.finish(), SessionStatus::Stopped);
        assert_eq!(cut.current_word(), None);
    }

    #[test]
    fn messages_render_like_the_status_line() {
        assert_eq!(
            Message::Listening { remaining: 3 }.to_string(),
            "🗣️ Listen... (3 left)"
        );
        assert_eq!(
            Message::Graded {
                word: "cat".into(),
                grade: miss("dig")
            }
            .to_string(),
            "❌ Incorrect! You wrote 'dig'. Correct: cat"
        );
        assert_eq!(
            Message::Graded {
                word: "cat".into(),
                grade: Grade::Unanswered
            }
            .to_string(),
            "✅ Correct spelling: cat (write it on paper?)"
        );
        assert_eq!(Message::from(SessionStatus::Completed).to_string(), "🎉 All words done!");
        assert_eq!(Message::from(SessionStatus::Stopped).to_string(), "⏹️ Practice stopped.");
    }

    #[test]
    fn timing_from_config() {
        let cfg = Config {
            answer_window_secs: 1.5,
            pause_secs: -2.0,
            ..Config::default()
        };
        let timing = Timing::from(&cfg);
        assert_eq!(timing.answer_window, Duration::from_millis(1500));
        assert_eq!(timing.pause, Duration::ZERO);
        assert_eq!(Timing::from(&Config::default()), Timing::default());
    }

    #[test]
    fn report_accuracy() {
        let now = Local::now();
        let report = SessionReport {
            status: SessionStatus::Completed,
            snapshot: SessionSnapshot {
                total: 4,
                position: 4,
                correct: 3,
                incorrect: 1,
                running: false,
            },
            missed: vec!["b".into()],
            started_at: now,
            finished_at: now,
        };
        assert_eq!(report.accuracy(), Some(75.0));
        assert_eq!(report.elapsed(), chrono::Duration::zero());
    }
}
