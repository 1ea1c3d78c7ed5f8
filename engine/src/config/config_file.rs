use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Validate;

// A missing file loads as `TConfig::default()`.
pub struct ConfigFile<TConfig> {
    path: PathBuf,
    _config: PhantomData<TConfig>,
}

impl<TConfig> ConfigFile<TConfig>
where
    TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn yaml(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _config: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TConfig, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Self::parse(&content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(TConfig::default()),
            Err(err) => Err(format!(
                "Failed to read settings {}: {}",
                self.path.display(),
                err
            )),
        }
    }

    pub fn save(&self, config: &TConfig) -> Result<(), String> {
        let content = Self::render(config)?;
        std::fs::write(&self.path, content)
            .map_err(|e| format!("Failed to write settings {}: {}", self.path.display(), e))
    }

    pub fn parse(content: &str) -> Result<TConfig, String> {
        let config: TConfig =
            serde_yaml_ng::from_str(content).map_err(|e| format!("Malformed settings: {}", e))?;
        config.validate().map_err(|e| format!("Invalid settings: {}", e))?;
        Ok(config)
    }

    pub fn render(config: &TConfig) -> Result<String, String> {
        config.validate().map_err(|e| format!("Invalid settings: {}", e))?;
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to render settings: {}", e))
    }
}
