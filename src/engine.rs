use std::io;

use nix::unistd::Pid;
use tracing::{debug, trace};

use crate::{
    builtin::Builtin,
    builtins::cd,
    config::Config,
    error::{Result, ShellError},
    process,
    report::Report,
    splitter::{Mode, Segment, Segments},
    step::{tokenize, Outcome, Step},
    watcher::{spawn_watcher, BackgroundJob},
};

/// What dispatching a single segment did.
#[derive(Debug)]
pub enum Dispatch {
    /// A built-in ran in-process. No status line.
    Builtin,
    /// The exit verb was seen; the caller must terminate with success.
    Exit,
    /// A sequential child ran to completion and was reaped.
    Waited { pid: Pid, outcome: Outcome },
    /// A background child was handed to its watcher.
    Detached(BackgroundJob),
}

/// Whether the read loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Tokenizes segments, runs built-ins and spawns external programs.
#[derive(Debug, Clone)]
pub struct Engine {
    max_args: usize,
}

impl Engine {
    pub fn new(config: &Config) -> Engine {
        Engine {
            max_args: config.max_args,
        }
    }

    /// Runs every segment of `line` in order.
    ///
    /// Per-command failures are printed and skipped; only fatal errors are returned.
    /// Stops at the exit verb without looking at the rest of the line.
    pub fn run_line(&self, line: &str) -> Result<Control> {
        for segment in Segments::new(line) {
            match self.dispatch(&segment) {
                Ok(Dispatch::Exit) => return Ok(Control::Exit),
                Ok(Dispatch::Detached(job)) => debug!(pid = %job.pid(), "detached"),
                Ok(_) => {}
                Err(ShellError::EmptyCommand) => trace!(span = ?segment.span, "empty segment"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => eprintln!("{}", e),
            }
        }
        Ok(Control::Continue)
    }

    pub fn dispatch(&self, segment: &Segment<'_>) -> Result<Dispatch> {
        let argv = tokenize(segment.text, self.max_args)?;
        let program = argv.program();
        debug!(program, mode = ?segment.mode, "dispatching");

        let command = match Step::new(&argv)? {
            Step::Builtin(Builtin::Exit) => return Ok(Dispatch::Exit),
            Step::Builtin(Builtin::ChangeDir) => {
                cd::run(argv.args())?;
                return Ok(Dispatch::Builtin);
            }
            Step::Command(command) => command,
        };

        let pid = command.spawn()?;

        match segment.mode {
            Mode::Sequential => {
                let outcome = process::wait(pid).map_err(|errno| ShellError::Wait {
                    pid,
                    source: io::Error::from(errno),
                })?;
                Report::Foreground {
                    program,
                    pid,
                    outcome,
                }
                .emit();
                Ok(Dispatch::Waited { pid, outcome })
            }
            Mode::Background => Ok(Dispatch::Detached(spawn_watcher(pid)?)),
        }
    }
}
