use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::*;
use futures::{pin_mut, StreamExt};
use tracing::{error, info};

use super::transcript::SessionLog;
use crate::client::types::ChatMessage;
use crate::client::OllamaClient;
use crate::console::LineSource;
use crate::error::{ConsoleError, SessionError};

/// Typing this (in any case) ends the session.
pub const EXIT_SENTINEL: &str = "exit";

pub const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

const PROMPT: &str = "\n\n\nEnter a prompt > ";

/// What happened during a finished session.
#[derive(Debug)]
pub struct SessionReport {
    pub log_path: PathBuf,
    /// Prompts that were sent to the model
    pub exchanges: usize,
    /// The error that ended the session early, if any
    pub failure: Option<SessionError>,
}

pub fn is_exit_sentinel(prompt: &str) -> bool {
    prompt.eq_ignore_ascii_case(EXIT_SENTINEL)
}

/// A prompt/response loop against one model, mirrored to a transcript.
pub struct ChatSession<'a> {
    client: &'a OllamaClient,
    log_dir: &'a Path,
}

impl<'a> ChatSession<'a> {
    pub fn new(client: &'a OllamaClient, log_dir: &'a Path) -> Self {
        Self { client, log_dir }
    }

    /// Runs the session until the user types `exit` or something fails.
    ///
    /// Failures during the loop are printed and end the session; the
    /// transcript keeps everything written before them and its path is
    /// always announced.
    ///
    /// # Errors
    ///
    /// Only when the transcript cannot be created, or the console is gone.
    pub async fn run(
        &self,
        model_name: &str,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<SessionReport, SessionError> {
        writeln!(out, "Running model: {}", model_name.bright_green())?;

        let mut log = match SessionLog::create(self.log_dir, &Local::now()) {
            Ok(log) => log,
            Err(e) => {
                error!("Could not open session log: {}", e);
                writeln!(out, "{}", format!("An error occurred: {}", e).red())?;
                return Err(e);
            }
        };
        info!("Chat session with {} started", model_name);

        let mut exchanges = 0;
        let result = self
            .converse(model_name, &mut log, &mut exchanges, input, out)
            .await;

        let failure = match result {
            Ok(()) | Err(SessionError::Console(ConsoleError::Closed)) => None,
            Err(e) => {
                error!("Chat session with {} failed: {}", model_name, e);
                let _ = writeln!(out, "\n{}", format!("An error occurred: {}", e).red());
                Some(e)
            }
        };

        let log_path = log.path().to_path_buf();
        drop(log);
        info!(
            "Chat session with {} ended after {} prompts, log at {}",
            model_name,
            exchanges,
            log_path.display()
        );
        writeln!(out, "Session log saved to: {}", log_path.display())?;

        Ok(SessionReport {
            log_path,
            exchanges,
            failure,
        })
    }

    async fn converse(
        &self,
        model_name: &str,
        log: &mut SessionLog,
        exchanges: &mut usize,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<(), SessionError> {
        loop {
            let prompt = input.read_line(PROMPT)?;

            log.append(&format!("User: {}\n", prompt))?;
            if is_exit_sentinel(&prompt) {
                return Ok(());
            }
            *exchanges += 1;

            log.append("Assistant: ")?;
            let messages = [ChatMessage::user(prompt)];
            let fragments = self.client.chat_stream(model_name, &messages);
            pin_mut!(fragments);

            while let Some(fragment) = fragments.next().await {
                let fragment = fragment?;
                write!(out, "{}", fragment.bright_cyan())?;
                out.flush()?;
                log.append(&fragment)?;
            }

            log.append(&format!("\n{}\n", SEPARATOR))?;
            writeln!(out, "\n{}", SEPARATOR)?;
        }
    }
}
