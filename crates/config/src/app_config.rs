// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use crate::paths_engine::{PathsEngine, DEFAULT_CONFIG_NAME};
use crate::yaml::load_yaml_with_env;
use crate::EntropyConfig;
use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

pub const DEFAULT_DEPLOYMENT_NAME: &str = "_default";

/// The config actually used throughout the app
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Deployment name. Each name has its own database.
    name: String,
    paths: PathsEngine,
    /// Owner used when a command does not name a caller
    owner: Option<Address>,
    entropy: EntropyConfig,
    /// Open Telemetry collector grpc endpoint. Eg. 127.0.0.1:4317
    otel: Option<String>,
}

impl AppConfig {
    pub fn try_from_unscoped(
        name: &str,
        config: UnscopedAppConfig,
        default_data_dir: &Path,
        default_config_dir: &Path,
        cwd: &Path,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            bail!("Deployment name cannot be empty");
        }
        if name.contains(['/', '\\']) {
            bail!("Deployment name '{}' cannot contain path separators", name);
        }

        let paths = PathsEngine::new(
            name,
            cwd,
            default_data_dir,
            default_config_dir,
            config.found_config_file.as_ref(),
            config.data_dir.as_ref(),
            config.db_file.as_ref(),
        );

        Ok(AppConfig {
            name: name.to_owned(),
            paths,
            owner: config.owner,
            entropy: config.entropy,
            otel: config.otel,
        })
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn db_file(&self) -> PathBuf {
        self.paths.db_file()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.paths.data_dir()
    }

    pub fn config_file(&self) -> PathBuf {
        self.paths.config_file()
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner
    }

    pub fn entropy(&self) -> &EntropyConfig {
        &self.entropy
    }

    pub fn otel(&self) -> Option<String> {
        self.otel.clone()
    }
}

/// Configuration file contents before the deployment name is applied.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct UnscopedAppConfig {
    /// Base folder for deployment data. Defaults to `~/.local/share/veil` on linux
    data_dir: Option<PathBuf>,
    /// Database file, absolute or relative to `<data_dir>/<name>`
    db_file: Option<PathBuf>,
    owner: Option<Address>,
    entropy: EntropyConfig,
    otel: Option<String>,
    /// Set from the resolved config path. Not meant to be written in config files.
    found_config_file: Option<PathBuf>,
}

impl UnscopedAppConfig {
    /// Convert to a scoped configuration using local OS based default configuration
    pub fn into_scoped(self, name: &str) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(
            name,
            self,
            &OsDirs::data_dir()?,
            &OsDirs::config_dir()?,
            &env::current_dir()?,
        )
    }

    /// Convert to a scoped configuration passing in some injected configuration
    pub fn into_scoped_with_defaults(
        self,
        name: &str,
        default_data_dir: &Path,
        default_config_dir: &Path,
        cwd: &Path,
    ) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(name, self, default_data_dir, default_config_dir, cwd)
    }
}

/// Values coming from the command line that override the file
#[derive(Default, Serialize, Deserialize, Clone, Debug)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    otel: Option<String>,
    found_config_file: Option<PathBuf>,
}

/// Load the config at `config_file`, or search for `veil.config.yaml` when none is given.
///
/// A missing file is only an error when the path was given explicitly; otherwise defaults apply.
pub fn load_config(
    name: &str,
    config_file: Option<String>,
    otel: Option<String>,
) -> Result<AppConfig> {
    let explicit = config_file.is_some();
    let config_file = config_file.map(PathBuf::from);

    let resolved_config_path = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file,
    );

    let loaded_yaml = match load_yaml_with_env(&resolved_config_path) {
        Ok(yaml) => yaml,
        Err(err) if !explicit && is_not_found(&err) => {
            tracing::debug!(path = ?resolved_config_path, "no config file found, using defaults");
            String::new()
        }
        Err(err) => return Err(err.context("Configuration file not found")),
    };

    let found_config_file = resolved_config_path
        .exists()
        .then_some(resolved_config_path);

    let config: UnscopedAppConfig =
        Figment::from(Serialized::defaults(&UnscopedAppConfig::default()))
            .merge(Yaml::string(&loaded_yaml))
            .merge(Serialized::defaults(&CliOverrides {
                otel,
                found_config_file,
            }))
            .extract()
            .context("Could not parse configuration")?;

    config
        .into_scoped(name)
        .with_context(|| format!("Could not apply deployment name '{}' to configuration.", name))
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

pub struct OsDirs;

impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Veil may only be run on an OS that can provide a config dir")?
            .join("veil"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        Ok(dirs::data_local_dir()
            .context("Veil may only be run on an OS that can provide a data dir")?
            .join("veil"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const OWNER: &str = "0x00000000000000000000000000000000000000aa";

    #[test]
    fn test_deserialization() -> Result<()> {
        let config_str = format!(
            r#"
data_dir: "/mydata/veil"
db_file: "./selector.db"
owner: "{OWNER}"
entropy:
  type: seeded
  seed: 7
"#
        );
        let unscoped: UnscopedAppConfig = serde_yaml::from_str(&config_str)?;
        let config = unscoped.into_scoped_with_defaults(
            "lottery",
            &PathBuf::from("/default/data"),
            &PathBuf::from("/default/config"),
            &PathBuf::from("/my/cwd"),
        )?;

        assert_eq!(config.name(), "lottery");
        assert_eq!(
            config.db_file(),
            PathBuf::from("/mydata/veil/lottery/selector.db")
        );
        assert_eq!(config.owner(), Some(OWNER.parse()?));
        assert_eq!(config.entropy(), &EntropyConfig::Seeded { seed: Some(7) });
        assert_eq!(config.otel(), None);
        Ok(())
    }

    #[test]
    fn rejects_unknown_keys_and_bad_names() -> Result<()> {
        assert!(serde_yaml::from_str::<UnscopedAppConfig>("chains: []").is_err());

        let err = UnscopedAppConfig::default().into_scoped_with_defaults(
            "../escape",
            &PathBuf::from("/d"),
            &PathBuf::from("/c"),
            &PathBuf::from("/w"),
        );
        assert!(err.is_err());
        Ok(())
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let home = format!("{}", jail.directory().to_string_lossy());
            jail.set_env("HOME", &home);
            jail.set_env("XDG_CONFIG_HOME", format!("{}/.config", home));
            jail.set_env("XDG_DATA_HOME", format!("{}/.local/share", home));

            let config = load_config(DEFAULT_DEPLOYMENT_NAME, None, None)
                .map_err(|e| e.to_string())?;
            let data_dir = OsDirs::data_dir().map_err(|e| e.to_string())?;

            assert_eq!(config.db_file(), data_dir.join("_default").join("db"));
            assert_eq!(config.entropy(), &EntropyConfig::default());
            assert_eq!(config.owner(), None);
            Ok(())
        });
    }

    #[test]
    fn test_file_not_found() -> Result<()> {
        let Err(err) = load_config("_default", Some("/nope".to_string()), None) else {
            bail!("error expected");
        };
        let Some(e) = err.downcast_ref::<std::io::Error>() else {
            bail!("io error expected");
        };
        assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_config_file_in_cwd() {
        Jail::expect_with(|jail| {
            jail.set_env("VEIL_SECRET", format!("0x{}", "11".repeat(32)));
            jail.create_file(
                "veil.config.yaml",
                &format!(
                    r#"
owner: "{OWNER}"
entropy:
  type: commit_reveal
  secret: "${{VEIL_SECRET}}"
"#
                ),
            )?;

            let config = load_config("lottery", None, Some("127.0.0.1:4317".into()))
                .map_err(|e| e.to_string())?;
            let root = jail.directory().to_path_buf();

            assert_eq!(config.config_file(), root.join("veil.config.yaml"));
            assert_eq!(
                config.db_file(),
                root.join(".veil").join("data").join("lottery").join("db")
            );
            assert_eq!(
                config.entropy(),
                &EntropyConfig::CommitReveal {
                    secret: format!("0x{}", "11".repeat(32))
                }
            );
            assert_eq!(config.otel(), Some("127.0.0.1:4317".to_string()));
            Ok(())
        });
    }
}
