//! Service configuration -- defaults, an optional config file, and
//! environment overrides layered with the `config` crate

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default log filter when `RUST_LOG` is unset
pub const RUST_LOG: &str = "info,actix_web=info";

/// Port the HTTP server binds when nothing else is configured
pub const DEFAULT_PORT: u16 = 8000;

/// Filename of the serialized TorchScript artifact
pub const MODEL_FILE: &str = "potatoes.pt";

/// Basename of the optional config file (`blightscan.toml`)
const CONFIG_FILE: &str = "blightscan";

/// Prefix for environment overrides (`BLIGHTSCAN_PORT=9000`)
const ENV_PREFIX: &str = "BLIGHTSCAN";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Overrides the artifact location; when absent the model is expected
    /// one directory above the executable
    pub model_path: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", DEFAULT_PORT as i64)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The artifact path: the configured override, or `../potatoes.pt`
    /// relative to the running executable
    pub fn model_path(&self) -> PathBuf {
        match &self.model_path {
            Some(path) => path.clone(),
            None => default_model_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            model_path: None,
        }
    }
}

/// The model ships one directory above the service's own install directory
pub fn default_model_path() -> PathBuf {
    let exe = std::env::current_exe().ok();
    let dir = exe
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    dir.join("..").join(MODEL_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(settings.model_path.is_none());
    }

    #[test]
    fn test_default_model_path_is_one_level_up() {
        let path = default_model_path();
        assert!(path.ends_with(Path::new("..").join(MODEL_FILE)));
    }

    #[test]
    fn test_model_path_override() {
        let settings = Settings {
            model_path: Some(PathBuf::from("/opt/models/potatoes.pt")),
            ..Settings::default()
        };
        assert_eq!(settings.model_path(), PathBuf::from("/opt/models/potatoes.pt"));
    }
}
