use std::io::{self, BufRead, Write};

use appart_core::Notifier;

/// Alerts go to stderr; confirmations read one line from stdin.
pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for TerminalNotifier {
    fn alert(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{title}\n{message} [o/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "o" | "oui" | "y" | "yes")
}
