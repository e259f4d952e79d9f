// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "veil.config.yaml";
pub const DEFAULT_DB_NAME: &str = "db";

/// Resolves where a deployment keeps its files.
///
/// When a config file was found somewhere above the working directory, data lives next to it
/// under `.veil/data`. Otherwise the OS data directory is used. Every deployment `name` gets its
/// own subfolder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsEngine {
    name: String,
    /// Config file as resolved from `--config` or the parent directory search.
    found_config_file: Option<PathBuf>,
    /// `data_dir` from the config file. Relative values are taken from the config file location.
    data_dir_override: Option<PathBuf>,
    /// Absolute path to a db, or a path relative to `<data_dir>/<name>/`.
    db_file_override: Option<PathBuf>,
    default_data_dir: PathBuf,
    default_config_dir: PathBuf,
    cwd: PathBuf,
}

impl PathsEngine {
    pub fn new(
        name: &str,
        cwd: &Path,
        default_data_dir: &Path,
        default_config_dir: &Path,
        found_config_file: Option<&PathBuf>,
        data_dir_override: Option<&PathBuf>,
        db_file_override: Option<&PathBuf>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            cwd: PathBuf::from(cwd),
            default_data_dir: PathBuf::from(default_data_dir),
            default_config_dir: PathBuf::from(default_config_dir),
            found_config_file: found_config_file.cloned(),
            data_dir_override: data_dir_override.cloned(),
            db_file_override: db_file_override.cloned(),
        }
    }

    /// Full path to the config file that will be loaded
    pub fn config_file(&self) -> PathBuf {
        if let Some(file) = self.found_config_file.clone() {
            return clean(file);
        }
        clean(self.default_config_dir.join(DEFAULT_CONFIG_NAME))
    }

    /// Full path to the deployment database.
    pub fn db_file(&self) -> PathBuf {
        let base = self.data_dir().join(&self.name);
        match &self.db_file_override {
            Some(db_file) if db_file.is_absolute() => clean(db_file),
            Some(db_file) => clean(base.join(db_file)),
            None => clean(base.join(DEFAULT_DB_NAME)),
        }
    }

    pub fn relative_to_config(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return PathBuf::from(path);
        }
        let config_file = self.config_file();
        let relative_from = config_file.parent().unwrap_or(&self.cwd);
        clean(relative_from.join(path))
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(data_dir) = &self.data_dir_override {
            return self.relative_to_config(data_dir);
        }

        if let Some(root_dir) = self.root_dir() {
            return root_dir.join("data");
        }

        self.default_data_dir.clone()
    }

    fn root_dir(&self) -> Option<PathBuf> {
        let file = self.found_config_file.as_ref()?;
        let parent = file.parent()?;
        Some(parent.join(".veil"))
    }
}

#[cfg(test)]
mod tests {
    use super::PathsEngine;
    use std::path::PathBuf;

    struct Case {
        name: &'static str,
        found_config_file: Option<&'static str>,
        data_dir_override: Option<&'static str>,
        db_file_override: Option<&'static str>,
        config_file: &'static str,
        db_file: &'static str,
    }

    fn run(cases: Vec<Case>) {
        for case in cases {
            let found = case.found_config_file.map(PathBuf::from);
            let data_dir = case.data_dir_override.map(PathBuf::from);
            let db_file = case.db_file_override.map(PathBuf::from);
            let paths = PathsEngine::new(
                "lottery",
                &PathBuf::from("/my/cwd"),
                &PathBuf::from("/default/data"),
                &PathBuf::from("/default/config"),
                found.as_ref(),
                data_dir.as_ref(),
                db_file.as_ref(),
            );

            assert_eq!(
                paths.config_file(),
                PathBuf::from(case.config_file),
                "config_file for case: {}",
                case.name
            );
            assert_eq!(
                paths.db_file(),
                PathBuf::from(case.db_file),
                "db_file for case: {}",
                case.name
            );
        }
    }

    #[test]
    fn resolves_paths() {
        run(vec![
            Case {
                name: "os defaults",
                found_config_file: None,
                data_dir_override: None,
                db_file_override: None,
                config_file: "/default/config/veil.config.yaml",
                db_file: "/default/data/lottery/db",
            },
            Case {
                name: "found config file",
                found_config_file: Some("/project/veil.config.yaml"),
                data_dir_override: None,
                db_file_override: None,
                config_file: "/project/veil.config.yaml",
                db_file: "/project/.veil/data/lottery/db",
            },
            Case {
                name: "relative data dir and db file",
                found_config_file: Some("/project/veil.config.yaml"),
                data_dir_override: Some("./state"),
                db_file_override: Some("registry.db"),
                config_file: "/project/veil.config.yaml",
                db_file: "/project/state/lottery/registry.db",
            },
            Case {
                name: "absolute db file",
                found_config_file: None,
                data_dir_override: Some("/var/veil"),
                db_file_override: Some("/tmp/one.db"),
                config_file: "/default/config/veil.config.yaml",
                db_file: "/tmp/one.db",
            },
        ]);
    }
}
