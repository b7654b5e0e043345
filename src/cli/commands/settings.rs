//! Config file commands.

use std::path::Path;

use clap::Subcommand;

use crate::config::{self, Config, ConfigError};
use crate::error::{Error, Result, ResultExt};

/// `config` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand
///
/// `path` is the `--config` override, if any.
pub fn cmd_config(config: &Config, path: Option<&Path>, action: &ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Path => match path.map(Path::to_path_buf).or_else(config::config_path) {
            Some(p) => println!("{}", p.display()),
            None => return Err(Error::Config(ConfigError::NoConfigDir).into()),
        },
        ConfigAction::Init { force } => {
            let target = path
                .map(Path::to_path_buf)
                .or_else(config::config_path)
                .ok_or(ConfigError::NoConfigDir)
                .with_context("locating config file")?;
            init(&target, *force)?;
            println!("✓ Wrote default config to {}", target.display());
        }
    }
    Ok(())
}

fn init(target: &Path, force: bool) -> Result<()> {
    if target.exists() && !force {
        return Err(ConfigError::AlreadyExists(target.to_path_buf()).into());
    }
    config::save_to(&Config::default(), target)
        .with_context(format!("writing default config to {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config.toml");

        init(&target, false).unwrap();
        assert!(target.exists());

        assert!(matches!(
            init(&target, false),
            Err(Error::Config(ConfigError::AlreadyExists(_)))
        ));
        init(&target, true).unwrap();
    }

    #[test]
    fn test_init_write_failure_names_target() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let target = blocker.join("config.toml");

        let err = init(&target, false).unwrap_err();
        assert!(err.to_string().contains("writing default config"));
        assert!(matches!(
            err,
            Error::WithContext { ref source, .. }
                if matches!(**source, Error::Config(ConfigError::CreateDir(..)))
        ));
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config.toml");

        cmd_config(&Config::default(), Some(&target), &ConfigAction::Init { force: false }).unwrap();

        let loaded = config::load_from(&target);
        assert!(loaded.conversion.precise);
    }
}
