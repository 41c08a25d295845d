//! Text-to-speech through the platform's speech program.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to run speech program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("speech program '{program}' exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

/// Something that can say text out loud. `speak` blocks until done.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Runs an external program with the text as its final argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new<P: Into<String>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `say` on macOS, `espeak-ng` everywhere else; `rate` is words per minute.
    pub fn system(rate: u32) -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", vec!["-r".into(), rate.to_string()])
        } else {
            Self::new("espeak-ng", vec!["-s".into(), rate.to_string()])
        }
    }

    /// Builds from an argv-style override. `None` when `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        debug!(program = %self.program, text, "speaking");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Exit {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Says nothing. Used for `--mute`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteSpeaker;

impl Speaker for MuteSpeaker {
    fn speak(&self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}
