//! Status lines printed once a child process has been waited on.
use std::fmt;

use nix::unistd::Pid;

use crate::{builtin::CHANGE_DIR_VERB, step::Outcome};

/// Who waited on the child decides how a normal exit is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report<'a> {
    Foreground {
        program: &'a str,
        pid: Pid,
        outcome: Outcome,
    },
    Background {
        pid: Pid,
        outcome: Outcome,
    },
}

impl<'a> Report<'a> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Report::Foreground { outcome, .. } | Report::Background { outcome, .. } => *outcome,
        }
    }

    pub fn pid(&self) -> Pid {
        match self {
            Report::Foreground { pid, .. } | Report::Background { pid, .. } => *pid,
        }
    }

    /// A normal exit of the directory-change verb is never reported.
    pub fn is_suppressed(&self) -> bool {
        matches!(
            self,
            Report::Foreground {
                program: CHANGE_DIR_VERB,
                outcome: Outcome::Exited(_),
                ..
            }
        )
    }

    /// Writes the line to stdout, or to stderr for the unexpected-termination diagnostic.
    pub fn emit(&self) {
        if self.is_suppressed() {
            return;
        }
        match self.outcome() {
            Outcome::Unexpected => eprintln!("{}", self),
            _ => println!("{}", self),
        }
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.outcome()) {
            (Report::Foreground { program, .. }, Outcome::Exited(code)) => {
                write!(f, "[{} exited with status {}]", program, code)
            }
            (Report::Background { pid, .. }, Outcome::Exited(code)) => {
                write!(f, "[background process {} exited with status {}]", pid, code)
            }
            (_, Outcome::Signaled(signal)) => {
                write!(f, "Child process {} died with signal {}", self.pid(), signal)
            }
            (_, Outcome::Unexpected) => write!(
                f,
                "Something unexpected happened to child process {}.",
                self.pid()
            ),
        }
    }
}
