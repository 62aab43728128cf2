use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stockpile_client::DEFAULT_BASE_URL;

use crate::cli::OutputFormat;

/// One named profile in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub server: Option<String>,
    pub format: Option<OutputFormat>,
}

/// The CLI configuration: a table of named profiles, stored as
/// `~/.stockpile/config.toml`.
///
/// Settings resolve flag-first: a `--server`/`--format` flag (or its env
/// var) wins over the profile, which wins over the built-in default.
pub struct Config {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Opens the config under `~/.stockpile/`, creating the directory on
    /// first use. A missing file is an empty config.
    pub fn open() -> Result<Self> {
        let dir = dirs::home_dir()
            .context("Cannot determine home directory")?
            .join(".stockpile");
        fs::create_dir_all(&dir)?;
        Self::at(dir.join("config.toml"))
    }

    /// Opens the config at an explicit path.
    pub fn at(path: PathBuf) -> Result<Self> {
        let profiles = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, profiles })
    }

    /// Writes the whole profile table back to disk.
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, toml::to_string_pretty(&self.profiles)?)?;
        Ok(())
    }

    fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Resolves the backend base URL for a profile.
    pub fn server_for(&self, name: &str, flag: Option<&str>) -> String {
        if let Some(server) = flag {
            return server.to_string();
        }
        self.profile(name)
            .and_then(|p| p.server.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Resolves the output format for a profile.
    pub fn format_for(&self, name: &str, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or_else(|| self.profile(name).and_then(|p| p.format))
            .unwrap_or_default()
    }

    pub fn set_server(&mut self, name: &str, server: String) {
        self.profiles.entry(name.to_string()).or_default().server = Some(server);
    }

    pub fn set_format(&mut self, name: &str, format: OutputFormat) {
        self.profiles.entry(name.to_string()).or_default().format = Some(format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_save_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::at(path.clone()).unwrap();
        config.set_server("staging", "http://staging.example.com/api".to_string());
        config.set_format("staging", OutputFormat::Json);
        config.save().unwrap();

        let reloaded = Config::at(path).unwrap();
        assert_eq!(
            reloaded.server_for("staging", None),
            "http://staging.example.com/api"
        );
        assert!(matches!(
            reloaded.format_for("staging", None),
            OutputFormat::Json
        ));
    }

    #[test]
    fn test_unknown_profile_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path().join("config.toml")).unwrap();

        assert_eq!(config.server_for("missing", None), DEFAULT_BASE_URL);
        assert!(matches!(
            config.format_for("missing", None),
            OutputFormat::Table
        ));
    }

    #[test]
    fn test_flag_wins_over_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::at(dir.path().join("config.toml")).unwrap();
        config.set_server("default", "http://profile.example.com".to_string());
        config.set_format("default", OutputFormat::Table);

        assert_eq!(
            config.server_for("default", Some("http://flag.example.com")),
            "http://flag.example.com"
        );
        assert!(matches!(
            config.format_for("default", Some(OutputFormat::Json)),
            OutputFormat::Json
        ));
    }

    #[test]
    fn test_profiles_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::at(dir.path().join("config.toml")).unwrap();
        config.set_server("a", "http://a.example.com".to_string());

        assert_eq!(config.server_for("a", None), "http://a.example.com");
        assert_eq!(config.server_for("b", None), DEFAULT_BASE_URL);
    }
}
