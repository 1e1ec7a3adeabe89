//! Interactive input, abstracted so flows can run against a script in tests

use std::io::{self, BufRead, IsTerminal, Write};

pub trait Prompter: Send + Sync {
    /// Read a secret; input is hidden when stdin is a terminal
    fn read_secret(&self, prompt: &str) -> io::Result<String>;

    /// Read a visible one-line answer
    fn read_line(&self, prompt: &str) -> io::Result<String>;
}

/// Real stdin/stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            rpassword::prompt_password(prompt)
        } else {
            // Piped input: nothing to hide
            self.read_line(prompt)
        }
    }

    fn read_line(&self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_owned())
    }
}
