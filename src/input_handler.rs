use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use nix::{errno::Errno, unistd::dup2_stdin};
use tracing::debug;

use crate::error::{Result, ShellError};

/// Picks where lines come from: stdin with no arguments, the named file with one.
/// A file replaces the process's stdin, so children read from it too.
pub fn open_input(args: &[String]) -> Result<Box<dyn BufRead>> {
    match args {
        [] => {}
        [path] => redirect_stdin(PathBuf::from(path))?,
        _ => return Err(ShellError::Usage),
    }
    Ok(Box::new(io::stdin().lock()))
}

fn redirect_stdin(path: PathBuf) -> Result<()> {
    let file = File::open(&path).map_err(|source| ShellError::InputOpen {
        path: path.clone(),
        source,
    })?;
    // Opening a directory succeeds, reading it does not
    if file.metadata().map(|m| m.is_dir()).unwrap_or(true) {
        return Err(ShellError::InputRedirect {
            path,
            source: io::Error::from(Errno::EISDIR),
        });
    }
    dup2_stdin(&file).map_err(|errno| ShellError::InputRedirect {
        path: path.clone(),
        source: io::Error::from(errno),
    })?;
    debug!(path = %path.display(), "reading commands from file");
    Ok(())
}

/// Prompts and reads one line at a time.
pub struct LineReader {
    source: Box<dyn BufRead>,
    prompt: String,
}

impl LineReader {
    pub fn new(source: Box<dyn BufRead>, prompt: &str) -> LineReader {
        LineReader {
            source,
            prompt: String::from(prompt),
        }
    }

    /// Next line including its terminator, `None` at end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        print!("{}", self.prompt);
        // a closed stdout should not stop us from reading
        io::stdout().flush().ok();

        let mut buf = String::new();
        match self.source.read_line(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf)),
            Err(e) => Err(ShellError::ReadLine(e)),
        }
    }
}

impl Iterator for LineReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        self.read_line().transpose()
    }
}
