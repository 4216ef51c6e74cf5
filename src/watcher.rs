//! Background jobs: one thread per detached child, waiting on that child only.
use std::thread::{self, JoinHandle};

use nix::{sys::signal::Signal, unistd::Pid};
use tracing::{debug, warn};

use crate::{
    error::{Result, ShellError},
    process,
    report::Report,
    step::Outcome,
};

/// A detached child and the task that will reap it.
/// The pid is moved into the task, nothing else waits on it.
/// Dropping the job detaches the task; the interpreter never joins it.
#[derive(Debug)]
pub struct BackgroundJob {
    pid: Pid,
    task: JoinHandle<Option<Outcome>>,
}

impl BackgroundJob {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Blocks until the watcher has reported. `None` if its wait failed.
    pub fn join(self) -> Option<Outcome> {
        self.task.join().ok().flatten()
    }
}

/// Hands `pid` to a new watcher thread and returns immediately.
pub fn spawn_watcher(pid: Pid) -> Result<BackgroundJob> {
    let task = thread::Builder::new()
        .name(format!("watch-{}", pid))
        .spawn(move || match process::wait(pid) {
            Ok(outcome) => {
                if let Outcome::Signaled(n) = outcome {
                    if let Ok(signal) = Signal::try_from(n) {
                        debug!(%pid, %signal, "background process killed");
                    }
                }
                Report::Background { pid, outcome }.emit();
                Some(outcome)
            }
            Err(e) => {
                warn!(%pid, error = %e, "waiting on background process failed");
                None
            }
        })
        .map_err(|source| ShellError::Watcher { pid, source })?;

    debug!(%pid, "watching background process");
    Ok(BackgroundJob { pid, task })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{process::ExternalCommand, step::tokenize};
    use std::time::{Duration, Instant};

    fn spawn(line: &str) -> Pid {
        ExternalCommand::new(&tokenize(line, 128).unwrap())
            .unwrap()
            .spawn()
            .unwrap()
    }

    #[test]
    fn watcher_returns_without_waiting() {
        let pid = spawn("sleep 1");
        let start = Instant::now();
        let job = spawn_watcher(pid).unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(job.pid(), pid);
        assert_eq!(job.join(), Some(Outcome::Exited(0)));
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[test]
    fn concurrent_jobs_keep_their_own_status() {
        let slow = spawn_watcher(spawn("sleep 0.3")).unwrap();
        let fast = spawn_watcher(spawn("false")).unwrap();

        assert_eq!(fast.join(), Some(Outcome::Exited(1)));
        assert_eq!(slow.join(), Some(Outcome::Exited(0)));
    }

    #[test]
    fn exec_failure_is_reported_as_status_one() {
        let job = spawn_watcher(spawn("no-such-program-for-mysh-tests")).unwrap();
        assert_eq!(job.join(), Some(Outcome::Exited(1)));
    }

    #[test]
    fn signaled_background_child() {
        let pid = spawn("sleep 5");
        let job = spawn_watcher(pid).unwrap();
        nix::sys::signal::kill(pid, Signal::SIGTERM).unwrap();
        assert_eq!(job.join(), Some(Outcome::Signaled(15)));
    }

    #[test]
    fn wait_failure_is_silent() {
        // not a child of this process
        let job = spawn_watcher(Pid::from_raw(1)).unwrap();
        assert_eq!(job.join(), None);
    }
}
