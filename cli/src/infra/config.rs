//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::Settings;

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FCT_CONFIG";

/// File name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".fctrc";

/// `KEY = value` file on disk, with `FCT_<KEY>` environment overrides.
pub struct FileConfigStore {
    path: Option<PathBuf>,
}

impl FileConfigStore {
    /// Store at `$FCT_CONFIG`, else `~/.fctrc`. Resolved lazily.
    #[must_use]
    pub fn discover() -> Self {
        Self { path: None }
    }

    /// Store at an explicit location.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Parse the file and apply overrides looked up through `env`.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let settings = match self.read_raw()? {
            Some(text) => {
                let path = self.path()?;
                Settings::parse(&text).with_context(|| format!("cannot parse {}", path.display()))?
            }
            None => Settings::default(),
        };
        Ok(settings.with_overrides(env))
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Settings> {
        self.load_with(|key| std::env::var(key).ok())
    }

    fn read_raw(&self) -> Result<Option<String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("cannot read {}", path.display()))
    }

    fn save_raw(&self, contents: &str) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Some(val) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }
}
