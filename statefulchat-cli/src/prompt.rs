//! Line input from the terminal

use dialoguer::Input;
use statefulchat_agent::{Prompt, Prompter};
use std::io::{self, BufRead, Write};

fn prompt_label(prompt: &Prompt) -> String {
    match prompt {
        Prompt::MenuChoice { count } => format!("Choose [1-{}/new/delete/exit]", count),
        Prompt::DeleteChoice { count } => format!("Delete which [1-{}/cancel]", count),
        Prompt::ConfirmDelete { title } => format!("Delete \"{}\"? [yes/no]", title),
        Prompt::UserTurn => "You".to_string(),
    }
}

/// Strip the line terminator left by `read_line`
fn chomp(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Map Ctrl-D / Ctrl-C on an interactive prompt to end of input
fn closed_as_none(result: dialoguer::Result<String>) -> io::Result<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(dialoguer::Error::IO(e))
            if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
            ) =>
        {
            Ok(None)
        }
        Err(dialoguer::Error::IO(e)) => Err(e),
    }
}

/// Reads from the terminal with `dialoguer`, or from plain stdin when not interactive
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    fn read_interactive(&self, label: String) -> io::Result<Option<String>> {
        let result = Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text();
        closed_as_none(result)
    }

    fn read_plain(&self, label: String) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}: ", label)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(chomp(line)))
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: Prompt) -> io::Result<Option<String>> {
        let label = prompt_label(&prompt);
        if self.interactive {
            self.read_interactive(label)
        } else {
            self.read_plain(label)
        }
    }
}
