//! fork/exec and waitpid for external programs.
use std::{ffi::CString, io};

use nix::{
    errno::Errno,
    libc,
    sys::wait::waitpid,
    unistd::{execvp, fork, write, ForkResult, Pid},
};
use tracing::debug;

use crate::{
    error::{Result, ShellError},
    step::{ArgVector, Outcome},
};

/// An external program with its argv ready for execvp.
/// Everything the child needs after fork is prepared up front.
#[derive(Debug)]
pub struct ExternalCommand {
    program: String,
    argv: Vec<CString>,
    exec_failed: Vec<u8>,
}

impl ExternalCommand {
    pub fn new(argv: &ArgVector<'_>) -> Result<ExternalCommand> {
        let program = argv.program().to_owned();
        let argv = argv
            .words()
            .iter()
            .map(|w| CString::new(*w))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ShellError::Exec {
                program: program.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, e),
            })?;
        let exec_failed = format!("exec failed: {}: ", program).into_bytes();

        Ok(ExternalCommand {
            program,
            argv,
            exec_failed,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Forks a child running the program. If exec fails the child prints
    /// `exec failed` and exits with status 1, so the parent still gets a pid to wait on.
    pub fn spawn(&self) -> Result<Pid> {
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!(program = %self.program, pid = %child, "spawned");
                Ok(child)
            }
            Ok(ForkResult::Child) => {
                let errno = match execvp(&self.argv[0], &self.argv) {
                    Ok(never) => match never {},
                    Err(errno) => errno,
                };
                self.exit_after_exec_failure(errno)
            }
            Err(errno) => Err(ShellError::Spawn {
                program: self.program.clone(),
                source: io::Error::from(errno),
            }),
        }
    }

    // Runs in the forked child: async-signal-safe calls only.
    fn exit_after_exec_failure(&self, errno: Errno) -> ! {
        let stderr = io::stderr();
        let _ = write(&stderr, &self.exec_failed);
        let _ = write(&stderr, errno.desc().as_bytes());
        let _ = write(&stderr, b"\n");
        unsafe { libc::_exit(1) }
    }
}

/// Blocks until `pid` terminates and reaps it.
pub fn wait(pid: Pid) -> nix::Result<Outcome> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => return Ok(Outcome::from(status)),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::step::tokenize;
    use nix::sys::wait::WaitPidFlag;

    fn command(line: &str) -> ExternalCommand {
        ExternalCommand::new(&tokenize(line, 128).unwrap()).unwrap()
    }

    #[test]
    fn spawn_and_wait() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut script, b"exit 5\n").unwrap();
        let pid = command(&format!("sh {}", script.path().display()))
            .spawn()
            .unwrap();
        assert_eq!(wait(pid), Ok(Outcome::Exited(5)));
        // reaped, nothing left to wait on
        assert_eq!(
            waitpid(pid, Some(WaitPidFlag::WNOHANG)),
            Err(Errno::ECHILD)
        );
    }

    #[test]
    fn exec_failure_child_exits_with_one() {
        let pid = command("no-such-program-for-mysh-tests").spawn().unwrap();
        assert_eq!(wait(pid), Ok(Outcome::Exited(1)));
    }

    #[test]
    fn signaled_child() {
        let pid = command("sleep 5").spawn().unwrap();
        nix::sys::signal::kill(pid, nix::sys::signal::Signal::SIGTERM).unwrap();
        assert_eq!(wait(pid), Ok(Outcome::Signaled(15)));
    }

    #[test]
    fn waiting_twice_is_an_error() {
        let pid = command("true").spawn().unwrap();
        assert!(wait(pid).is_ok());
        assert_eq!(wait(pid), Err(Errno::ECHILD));
    }
}
