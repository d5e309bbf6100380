use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NoteoError, Result};

/// Name of the file marking the root of a repository
pub const CONFIG_FILE: &str = ".noteo.yml";

pub(crate) const CONFIG_TEMPLATE: &str = "\
# This is a Noteo configuration for repository (YAML format)
# editor: vim +
";

/// Repository-level options read from `.noteo.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Command used to edit new notes, arguments separated by spaces
    pub editor: Option<String>,
}

impl RepoConfig {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load the config of the repository rooted at `root`. A file holding only
    /// comments yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let text = fs::read_to_string(&path)
            .map_err(|e| NoteoError::io_operation("read", path.display(), e))?;
        if text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        }) {
            return Ok(RepoConfig::default());
        }
        let config = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    /// Editor command: the repository setting, then `$VISUAL`, then `$EDITOR`,
    /// then a platform default.
    pub fn editor_command(&self) -> String {
        self.editor_command_with(|name| std::env::var(name).ok())
    }

    fn editor_command_with(&self, env: impl Fn(&str) -> Option<String>) -> String {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        non_empty(self.editor.clone())
            .or_else(|| non_empty(env("VISUAL")))
            .or_else(|| non_empty(env("EDITOR")))
            .unwrap_or_else(|| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "vim +".to_string()
                }
            })
    }
}
