//! Configuration management trait.
//!
//! [`ConfigManager`] gives any serde-serializable config struct layered
//! loading (defaults, then the TOML file, then `{PREFIX}_*` variables), path
//! resolution, and env-var export. The CLI's `config` subcommands are
//! written against this trait.
//!
//! Variables name top-level keys after a single underscore and nested keys
//! after a double one: `EIPTOOLS_DATA_DIR`, `EIPTOOLS_SERVER__PORT`.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::paths::{expand_tilde, project_config_dir};
use crate::{Error, Result};

/// A TOML-backed configuration type.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name, used for the config directory and env-var prefix.
    fn project_name() -> &'static str;

    /// Environment variable prefix, e.g. `EIPTOOLS`.
    fn env_prefix() -> String {
        Self::project_name().to_uppercase().replace(['-', ' '], "_")
    }

    /// Default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        project_config_dir(Self::project_name()).map(|dir| dir.join("config.toml"))
    }

    /// Resolve the config file path.
    ///
    /// Checks in order: the explicit path, `{PREFIX}_CONFIG`, the default path.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(expand_tilde(path));
        }
        if let Ok(path) = std::env::var(format!("{}_CONFIG", Self::env_prefix())) {
            return Some(expand_tilde(&path));
        }
        Self::default_config_path()
    }

    /// Layered sources: defaults, the config file, then `{PREFIX}_*` variables.
    ///
    /// A missing file contributes nothing.
    fn figment(config_path: Option<&str>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = Self::resolve_config_path(config_path) {
            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(
            Env::prefixed(&format!("{}_", Self::env_prefix()))
                .ignore(&["config"])
                .split(ENV_NESTING),
        )
    }

    /// Load the configuration.
    ///
    /// A missing file yields the defaults; a malformed file or an env value
    /// of the wrong type is an error.
    fn load(config_path: Option<&str>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .map_err(|e| Error::config(format!("Failed to load configuration: {e}")))
    }

    /// Serialize to a pretty TOML string.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten the configuration into `PREFIX_KEY` / `PREFIX_SECTION__KEY` pairs,
    /// the names [`ConfigManager::load`] reads back.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&Self::env_prefix(), "_", &value, &mut vars);
        Ok(vars)
    }
}

/// Separator between nested keys in env-var names.
pub const ENV_NESTING: &str = "__";

fn flatten_env(prefix: &str, separator: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let name = format!("{prefix}{separator}{}", key.to_uppercase().replace('-', "_"));
                flatten_env(&name, ENV_NESTING, child, out);
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestConfig {
        name: String,
        server: TestServer,
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestServer {
        port: u16,
        hosts: Vec<String>,
    }

    impl ConfigManager for TestConfig {
        fn project_name() -> &'static str {
            "eiptools-test"
        }
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(TestConfig::env_prefix(), "EIPTOOLS_TEST");
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("absent.toml");
            let config = TestConfig::load(path.to_str()).unwrap();
            assert_eq!(config, TestConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_reads_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "name = \"site\"\n[server]\nport = 8080\n")?;
            let path = jail.directory().join("config.toml");

            let config = TestConfig::load(path.to_str()).unwrap();
            assert_eq!(config.name, "site");
            assert_eq!(config.server.port, 8080);
            assert!(config.server.hosts.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_load_malformed_file_errors() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "name = [unterminated")?;
            let path = jail.directory().join("config.toml");
            assert!(TestConfig::load(path.to_str()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "name = \"site\"\n[server]\nport = 8080\n")?;
            jail.set_env("EIPTOOLS_TEST_NAME", "from-env");
            jail.set_env("EIPTOOLS_TEST_SERVER__PORT", "9090");
            jail.set_env("EIPTOOLS_TEST_CONFIG", "config.toml");

            let config = TestConfig::load(None).unwrap();
            assert_eq!(config.name, "from-env");
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_env_only_keeps_defaults_elsewhere() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("EIPTOOLS_TEST_SERVER__PORT", "7000");
            let missing = jail.directory().join("absent.toml");

            let config = TestConfig::load(missing.to_str()).unwrap();
            assert_eq!(config.server.port, 7000);
            assert_eq!(config.name, "");
            Ok(())
        });
    }

    #[test]
    fn test_env_wrong_type_errors() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("EIPTOOLS_TEST_SERVER__PORT", "eighty");
            let missing = jail.directory().join("absent.toml");

            let err = TestConfig::load(missing.to_str()).unwrap_err();
            assert!(err.to_string().contains("Failed to load configuration"));
            Ok(())
        });
    }

    #[test]
    fn test_to_env_vars_flattens() {
        let config = TestConfig {
            name: "site".to_string(),
            server: TestServer {
                port: 3000,
                hosts: vec!["a".to_string(), "b".to_string()],
            },
        };
        let vars = config.to_env_vars().unwrap();
        assert!(vars.contains(&("EIPTOOLS_TEST_NAME".to_string(), "site".to_string())));
        assert!(vars.contains(&("EIPTOOLS_TEST_SERVER__PORT".to_string(), "3000".to_string())));
        assert!(vars.contains(&("EIPTOOLS_TEST_SERVER__HOSTS".to_string(), "a,b".to_string())));
    }

    #[test]
    fn test_to_toml_string_roundtrip() {
        let config = TestConfig {
            name: "x".to_string(),
            ..Default::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed: TestConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
