use crate::error::PracticeError;
use crate::session::{
    Message, SessionEvent, SessionEventKind, SessionId, SessionReport, SessionSnapshot,
};

/// What the screen shows, built up from controller publications.
///
/// Events from any session other than the one last started are dropped, so
/// a cancelled worker's late messages never overwrite a new run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    pub session: Option<SessionId>,
    pub status: String,
    pub definition: String,
    pub stats: SessionSnapshot,
    pub missed: Vec<String>,
    pub report: Option<SessionReport>,
}

impl SessionView {
    /// Clears everything for a session that is about to start.
    pub fn begin(&mut self, session: SessionId, total: usize) {
        *self = Self {
            session: Some(session),
            stats: SessionSnapshot {
                total,
                running: true,
                ..SessionSnapshot::default()
            },
            ..Self::default()
        };
    }

    pub fn notice(&mut self, err: &PracticeError) {
        self.status = format!("❗ {err}");
    }

    /// Immediate feedback for a stop request; the worker confirms later.
    pub fn stopping(&mut self) {
        self.status = Message::Stopped.to_string();
        self.definition.clear();
    }

    pub fn apply(&mut self, event: SessionEvent) {
        if self.session != Some(event.session) {
            return;
        }

        match event.kind {
            SessionEventKind::Started { total } => {
                self.stats.total = total;
                self.stats.running = true;
            }
            SessionEventKind::Message(message) => self.status = message.to_string(),
            SessionEventKind::Definition(text) => {
                self.definition = format!("📖 Definition: {text}");
            }
            SessionEventKind::Progress(snapshot) => self.stats = snapshot,
            SessionEventKind::Missed(word) => {
                if !self.missed.contains(&word) {
                    self.missed.push(word);
                }
            }
            SessionEventKind::Finished(report) => {
                self.stats = report.snapshot;
                self.definition.clear();
                self.report = Some(report);
            }
        }
    }
}
