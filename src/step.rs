use nix::sys::wait::WaitStatus;

use crate::{
    builtin::Builtin,
    error::{Result, ShellError},
    process::ExternalCommand,
};

/// Ordered, non-empty tokens of a segment. The first one is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector<'a> {
    words: Vec<&'a str>,
}

impl<'a> ArgVector<'a> {
    pub fn program(&self) -> &'a str {
        self.words[0]
    }

    pub fn args(&self) -> &[&'a str] {
        &self.words[1..]
    }

    pub fn words(&self) -> &[&'a str] {
        &self.words
    }
}

/// Splits a segment on spaces, tabs and the line terminator, dropping empty tokens.
pub fn tokenize(segment: &str, max_args: usize) -> Result<ArgVector<'_>> {
    let words: Vec<&str> = segment.split_whitespace().collect();

    if words.is_empty() {
        return Err(ShellError::EmptyCommand);
    }
    if words.len() > max_args {
        return Err(ShellError::TooManyArguments {
            count: words.len(),
            max: max_args,
        });
    }
    Ok(ArgVector { words })
}

/// Step, the basic unit of execution. Either a built-in verb handled in-process or an external program.
#[derive(Debug)]
pub enum Step {
    Command(ExternalCommand),
    Builtin(Builtin),
}

impl Step {
    /// Built-ins win over external programs of the same name.
    pub fn new(argv: &ArgVector<'_>) -> Result<Step> {
        match Builtin::lookup(argv.program()) {
            Some(builtin) => Ok(Step::Builtin(builtin)),
            None => Ok(Step::Command(ExternalCommand::new(argv)?)),
        }
    }
}

/// How a child process ended.
/// Built from the wait status so the same classification serves both waiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Normal exit, low 8 bits of the exit code.
    Exited(i32),
    /// Terminated by the given signal number.
    Signaled(i32),
    Unexpected,
}

impl From<WaitStatus> for Outcome {
    fn from(status: WaitStatus) -> Outcome {
        match status {
            WaitStatus::Exited(_, code) => Outcome::Exited(code & 0xff),
            WaitStatus::Signaled(_, signal, _) => Outcome::Signaled(signal as i32),
            _ => Outcome::Unexpected,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nix::{sys::signal::Signal, unistd::Pid};

    #[test]
    fn tokenize_collapses_whitespace() {
        let argv = tokenize("  ls \t -la   /tmp \n", 128).unwrap();
        assert_eq!(argv.program(), "ls");
        assert_eq!(argv.args(), &["-la", "/tmp"]);
        assert_eq!(argv.words(), &["ls", "-la", "/tmp"]);
    }

    #[test]
    fn tokenize_whitespace_only_is_empty_command() {
        assert!(matches!(tokenize(" \t \n", 128), Err(ShellError::EmptyCommand)));
        assert!(matches!(tokenize("", 128), Err(ShellError::EmptyCommand)));
    }

    #[test]
    fn tokenize_respects_argument_cap() {
        assert!(tokenize("a b c", 3).is_ok());
        match tokenize("a b c d", 3) {
            Err(ShellError::TooManyArguments { count, max }) => {
                assert_eq!(count, 4);
                assert_eq!(max, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn builtins_are_recognized_before_commands() {
        let argv = tokenize("cd /tmp", 128).unwrap();
        assert!(matches!(Step::new(&argv), Ok(Step::Builtin(Builtin::ChangeDir))));

        let argv = tokenize("exit now", 128).unwrap();
        assert!(matches!(Step::new(&argv), Ok(Step::Builtin(Builtin::Exit))));

        let argv = tokenize("echo cd", 128).unwrap();
        match Step::new(&argv) {
            Ok(Step::Command(c)) => assert_eq!(c.program(), "echo"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn nul_byte_cannot_be_executed() {
        let argv = tokenize("echo a\0b", 128).unwrap();
        assert!(matches!(Step::new(&argv), Err(ShellError::Exec { .. })));
    }

    #[test]
    fn outcome_from_wait_status() {
        let pid = Pid::from_raw(42);
        assert_eq!(Outcome::from(WaitStatus::Exited(pid, 3)), Outcome::Exited(3));
        assert_eq!(Outcome::from(WaitStatus::Exited(pid, 300)), Outcome::Exited(44));
        assert_eq!(
            Outcome::from(WaitStatus::Signaled(pid, Signal::SIGKILL, false)),
            Outcome::Signaled(9)
        );
        assert_eq!(Outcome::from(WaitStatus::StillAlive), Outcome::Unexpected);
    }
}
