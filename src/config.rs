use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ShellError};

pub const CONFIG_ENV: &str = "MYSH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Printed before every read.
    pub prompt: String,
    /// Most tokens a single command may have, program name included.
    pub max_args: usize,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prompt: String::from("$ "),
            max_args: 128,
            log_filter: String::from("warn"),
        }
    }
}

impl Config {
    /// Loads the config file if there is one. A missing file is not an error.
    pub fn load() -> Result<Config> {
        let path = match Config::path() {
            Some(path) => path,
            None => return Ok(Config::from_default()),
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::from_default());
        }
        Config::from_file(&path)
    }

    pub fn from_default() -> Config {
        Config::default()
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path).map_err(|source| ShellError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ShellError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `$MYSH_CONFIG`, else `<config dir>/mysh/config.toml`.
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|mut config_path| {
            config_path.push("mysh");
            config_path.push("config.toml");
            config_path
        })
    }

    fn validate(&self) -> Result<()> {
        if self.max_args == 0 {
            return Err(ShellError::InvalidConfig(String::from(
                "max_args must be at least 1",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("prompt = \"> \"\n");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.max_args, 128);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn full_file() {
        let file = write_config("prompt = \"% \"\nmax_args = 16\nlog_filter = \"debug\"\n");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config,
            Config {
                prompt: String::from("% "),
                max_args: 16,
                log_filter: String::from("debug"),
            }
        );
    }

    #[test]
    fn zero_max_args_is_rejected() {
        let file = write_config("max_args = 0\n");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ShellError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = write_config("max_args = \"many\"\n");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ShellError::ConfigParse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("absent.toml")),
            Err(ShellError::ConfigRead { .. })
        ));
    }
}
