use std::io::{self, BufRead, IsTerminal, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::ConsoleError;

/// Something that hands out one line of user input per prompt.
pub trait LineSource {
    /// Shows `prompt` and blocks until a full line is available.
    /// The returned line has no trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;
}

/// Interactive terminal input backed by a rustyline editor with history.
pub struct EditorInput {
    editor: DefaultEditor,
}

impl EditorInput {
    pub fn new() -> Result<Self, ConsoleError> {
        let editor = DefaultEditor::new().map_err(|e| ConsoleError::Io(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Err(ConsoleError::Closed),
            Err(e) => Err(ConsoleError::Io(e.to_string())),
        }
    }
}

/// Line input from any buffered reader, used when stdin is piped.
/// Prompts are echoed to stdout so a scripted run reads like an interactive one.
pub struct PipedInput<R> {
    reader: R,
    echo_prompts: bool,
}

impl<R: BufRead> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            echo_prompts: true,
        }
    }

    /// Reader that never prints prompts.
    pub fn quiet(reader: R) -> Self {
        Self {
            reader,
            echo_prompts: false,
        }
    }
}

impl<R: BufRead> LineSource for PipedInput<R> {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        if self.echo_prompts {
            let mut stdout = io::stdout();
            let _ = write!(stdout, "{}", prompt);
            let _ = stdout.flush();
        }

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(ConsoleError::Closed);
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

/// Picks the rustyline editor for terminals and plain line reading otherwise.
pub fn stdin_source() -> Result<Box<dyn LineSource>, ConsoleError> {
    if io::stdin().is_terminal() {
        Ok(Box::new(EditorInput::new()?))
    } else {
        Ok(Box::new(PipedInput::new(io::stdin().lock())))
    }
}
