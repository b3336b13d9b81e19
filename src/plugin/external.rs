//! Tabulation delegated to a user-supplied script.

use super::Tabulator;
use crate::config::PluginConfig;
use crate::error::TabulateError;
use anyhow::Result;
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

/// Runs an override script as a child process with the full invocation.
///
/// The child receives `<invocation> <args...>` after the script path and
/// inherits the working directory and standard streams.
#[derive(Debug, Clone)]
pub struct ExternalTabulator {
    script: PathBuf,
    interpreter: Option<String>,
}

impl ExternalTabulator {
    pub fn new(script: PathBuf, config: &PluginConfig) -> Self {
        let interpreter = Some(config.interpreter.trim())
            .filter(|i| !i.is_empty())
            .map(String::from);
        Self {
            script,
            interpreter,
        }
    }

    pub fn script(&self) -> &PathBuf {
        &self.script
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut c = Command::new(interpreter);
                c.arg(&self.script);
                c
            }
            None => Command::new(&self.script),
        };
        command.args(args);
        command
    }
}

impl Tabulator for ExternalTabulator {
    fn tabulate(&self, args: &[String]) -> Result<i32> {
        info!("Delegating to {}", self.script.display());

        let status = self
            .command(args)
            .status()
            .map_err(|source| TabulateError::PluginLaunch {
                path: self.script.clone(),
                source,
            })?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                warn!("{} terminated by signal", self.script.display());
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_with_interpreter() {
        let tabulator = ExternalTabulator::new(PathBuf::from("/x/tabulate.py"), &PluginConfig::default());
        let command = tabulator.command(&args(&["trialtab", "--csv", "logs"]));

        assert_eq!(command.get_program(), OsStr::new("python3"));
        let got: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(got, vec!["/x/tabulate.py", "trialtab", "--csv", "logs"]);
    }

    #[test]
    fn test_command_without_interpreter() {
        let config = PluginConfig {
            interpreter: "  ".to_string(),
            ..PluginConfig::default()
        };
        let tabulator = ExternalTabulator::new(PathBuf::from("/x/tabulate.py"), &config);
        let command = tabulator.command(&args(&["trialtab", "logs"]));

        assert_eq!(command.get_program(), OsStr::new("/x/tabulate.py"));
        let got: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(got, vec!["trialtab", "logs"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_forwarded() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("tabulate.py");
        std::fs::write(&script, "exit 7\n").unwrap();
        let config = PluginConfig {
            interpreter: "sh".to_string(),
            ..PluginConfig::default()
        };

        let code = ExternalTabulator::new(script, &config)
            .tabulate(&args(&["trialtab"]))
            .unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_launch_failure_is_an_error() {
        let config = PluginConfig {
            interpreter: "trialtab-no-such-interpreter".to_string(),
            ..PluginConfig::default()
        };
        let err = ExternalTabulator::new(PathBuf::from("tabulate.py"), &config)
            .tabulate(&args(&["trialtab"]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulateError>(),
            Some(TabulateError::PluginLaunch { .. })
        ));
    }
}
