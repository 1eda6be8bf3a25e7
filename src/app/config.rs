// lineedit-core - Command history, color markup and cursor tracking for line editors
// Copyright (C) 2025  lineedit-core contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::app::history::DEFAULT_RETENTION_LIMIT;
use crate::ui::attr::AnsiState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const HISTORY_FILE_ENV: &str = "LINEEDIT_HISTORY_FILE";
const HISTORY_FILE_NAME: &str = ".history";
const CONFIG_DIR_NAME: &str = "lineedit";
const CONFIG_FILE: &str = "config.json";

/// Session settings. Every field has a default so a partial config file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_file: PathBuf,
    /// Entries persisted to `history_file`; negative means unlimited.
    pub history_length: i64,
    pub default_attribute: AnsiState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_file: default_history_path(),
            history_length: DEFAULT_RETENTION_LIMIT,
            default_attribute: AnsiState::default(),
        }
    }
}

impl Config {
    /// Load `path`, or the per-user config file when `path` is `None`.
    ///
    /// A missing or malformed file yields defaults. `LINEEDIT_HISTORY_FILE`
    /// overrides whatever history file the file named.
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = path
            .map(Path::to_path_buf)
            .or_else(config_path)
            .and_then(|path| read_config(&path))
            .unwrap_or_default();
        if let Some(file) = history_file_from_env() {
            config.history_file = file;
        }
        config
    }
}

/// `~/.history`, or `.history` in the working directory when there is no home.
pub fn default_history_path() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from(HISTORY_FILE_NAME), |home| home.join(HISTORY_FILE_NAME))
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}

fn history_file_from_env() -> Option<PathBuf> {
    std::env::var(HISTORY_FILE_ENV)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn read_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Config>(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::debug!("ignoring malformed config {}: {err}", path.display());
            None
        }
    }
}
