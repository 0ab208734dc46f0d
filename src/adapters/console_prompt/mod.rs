// Console prompt adapter - Yes/no questions on the terminal

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::PromptError;
use crate::domain::rules::is_affirmative;
use crate::ports::PromptPort;

type SharedReader = Arc<Mutex<Box<dyn BufRead + Send>>>;
type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Asks on stdout, reads one answer line from stdin
pub struct ConsolePromptAdapter {
    input: SharedReader,
    output: SharedWriter,
}

impl ConsolePromptAdapter {
    /// Prompt on the process's own terminal
    pub fn new() -> Self {
        Self::with_io(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Prompt over arbitrary streams
    pub fn with_io(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: Arc::new(Mutex::new(input)),
            output: Arc::new(Mutex::new(output)),
        }
    }
}

impl Default for ConsolePromptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptPort for ConsolePromptAdapter {
    async fn confirm(&self, question: &str) -> Result<bool, PromptError> {
        let input = Arc::clone(&self.input);
        let output = Arc::clone(&self.output);
        let question = format!("? {} (y/n): ", question);

        // Reading the terminal blocks, keep it off the runtime threads.
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            {
                let mut out = output.lock().map_err(|_| io::Error::other("prompt output poisoned"))?;
                out.write_all(question.as_bytes())?;
                out.flush()?;
            }
            let mut line = String::new();
            input
                .lock()
                .map_err(|_| io::Error::other("prompt input poisoned"))?
                .read_line(&mut line)?;
            Ok(line)
        })
        .await
        .map_err(|e| PromptError::Read(io::Error::other(e)))?
        .map_err(PromptError::Read)?;

        debug!(answer = %answer.trim(), "operator answered");
        Ok(is_affirmative(&answer))
    }
}
