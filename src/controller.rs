//! Drives a practice session on a worker thread.
//!
//! The controller owns at most one worker. Each worker owns its
//! [`SessionState`] outright and reports through a [`Publisher`]; the only
//! state shared with the caller is the session's [`CancelToken`] and the
//! live submission field.

use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::definition::DefinitionLookup;
use crate::error::PracticeError;
use crate::grading;
use crate::session::{
    Message, SessionEvent, SessionEventKind, SessionId, SessionReport, SessionState, Timing,
};
use crate::speech::Speaker;
use crate::submission::SubmissionSource;

/// One-way channel from the controller to the presentation layer
pub trait Publisher: Send + Sync {
    fn publish(&self, event: SessionEvent);
}

impl Publisher for mpsc::Sender<SessionEvent> {
    fn publish(&self, event: SessionEvent) {
        // a dropped receiver only means nobody is watching any more
        let _ = self.send(event);
    }
}

struct ActiveSession {
    id: SessionId,
    token: CancelToken,
    handle: JoinHandle<SessionReport>,
}

pub struct SessionController {
    speaker: Arc<dyn Speaker>,
    definitions: Option<Arc<dyn DefinitionLookup>>,
    submission: Arc<dyn SubmissionSource>,
    publisher: Arc<dyn Publisher>,
    timing: Timing,
    next_id: SessionId,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(
        speaker: Arc<dyn Speaker>,
        submission: Arc<dyn SubmissionSource>,
        publisher: Arc<dyn Publisher>,
        timing: Timing,
    ) -> Self {
        Self {
            speaker,
            definitions: None,
            submission,
            publisher,
            timing,
            next_id: 1,
            active: None,
        }
    }

    /// Looks up and publishes a definition for every word.
    pub fn with_definitions(mut self, lookup: Arc<dyn DefinitionLookup>) -> Self {
        self.definitions = Some(lookup);
        self
    }

    pub fn has_definitions(&self) -> bool {
        self.definitions.is_some()
    }

    /// Starts a fresh session over `words`, replacing any running one.
    ///
    /// A previous worker is cancelled and joined before the new state is
    /// created, so two grading cycles never run at once.
    pub fn start(&mut self, words: Vec<String>) -> Result<SessionId, PracticeError> {
        if words.is_empty() {
            return Err(PracticeError::NoWordsAvailable);
        }

        self.shutdown();

        let id = self.next_id;
        let token = CancelToken::new();
        let worker = Worker {
            id,
            state: SessionState::new(words),
            token: token.clone(),
            speaker: Arc::clone(&self.speaker),
            definitions: self.definitions.clone(),
            submission: Arc::clone(&self.submission),
            publisher: Arc::clone(&self.publisher),
            timing: self.timing,
        };

        let handle = thread::Builder::new()
            .name("practice-session".into())
            .spawn(move || worker.run())
            .map_err(PracticeError::Spawn)?;

        self.next_id += 1;
        self.active = Some(ActiveSession { id, token, handle });
        Ok(id)
    }

    /// Asks the running session to stop at its next checkpoint. No-op when idle.
    pub fn stop(&self) {
        if let Some(active) = &self.active {
            if !active.token.is_cancelled() {
                info!(session = active.id, "stop requested");
            }
            active.token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.token.is_cancelled() && !a.handle.is_finished())
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Blocks until the current worker ends and returns its report.
    pub fn wait(&mut self) -> Option<SessionReport> {
        let active = self.active.take()?;
        match active.handle.join() {
            Ok(report) => Some(report),
            Err(_) => {
                warn!(session = active.id, "practice worker panicked");
                None
            }
        }
    }

    fn shutdown(&mut self) -> Option<SessionReport> {
        self.stop();
        self.wait()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    id: SessionId,
    state: SessionState,
    token: CancelToken,
    speaker: Arc<dyn Speaker>,
    definitions: Option<Arc<dyn DefinitionLookup>>,
    submission: Arc<dyn SubmissionSource>,
    publisher: Arc<dyn Publisher>,
    timing: Timing,
}

impl Worker {
    fn emit(&self, kind: SessionEventKind) {
        self.publisher.publish(SessionEvent {
            session: self.id,
            kind,
        });
    }

    fn message(&self, message: Message) {
        self.emit(SessionEventKind::Message(message));
    }

    fn progress(&self) {
        self.emit(SessionEventKind::Progress(self.state.snapshot()));
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.speaker.speak(text) {
            warn!(session = self.id, error = %e, "speech failed");
        }
    }

    fn run(mut self) -> SessionReport {
        let started_at = Local::now();
        let total = self.state.snapshot().total;
        info!(session = self.id, total, "session started");
        self.emit(SessionEventKind::Started { total });
        self.progress();

        while !self.token.is_cancelled() {
            let Some(word) = self.state.current_word().map(str::to_owned) else {
                break;
            };
            if !self.practice(&word) {
                break;
            }
        }

        let status = self.state.finish();
        let report = SessionReport {
            status,
            snapshot: self.state.snapshot(),
            missed: self.state.missed().to_vec(),
            started_at,
            finished_at: Local::now(),
        };
        info!(
            session = self.id,
            %status,
            correct = report.snapshot.correct,
            incorrect = report.snapshot.incorrect,
            "session finished"
        );

        self.message(status.into());
        self.progress();
        self.emit(SessionEventKind::Finished(report.clone()));
        report
    }

    /// Runs one grading cycle. Returns false if cancelled along the way.
    fn practice(&mut self, word: &str) -> bool {
        self.message(Message::Listening {
            remaining: self.state.remaining(),
        });
        self.progress();
        self.say(word);

        if let Some(lookup) = &self.definitions {
            let definition = lookup.define(word);
            self.emit(SessionEventKind::Definition(definition));
        }

        self.submission.clear();
        self.message(Message::AwaitingAnswer);
        if !self.token.sleep(self.timing.answer_window) {
            debug!(session = self.id, word, "cancelled while waiting for an answer");
            return false;
        }

        let grade = grading::grade(&self.submission.current(), word);
        debug!(session = self.id, word, ?grade, "graded");
        let newly_missed = self.state.record(&grade);
        self.message(Message::Graded {
            word: word.to_string(),
            grade,
        });
        if let Some(missed) = newly_missed {
            self.emit(SessionEventKind::Missed(missed));
        }
        self.progress();

        self.say(&grading::reinforcement(word));

        self.token.sleep(self.timing.pause)
    }
}
