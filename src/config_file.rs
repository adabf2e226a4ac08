use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{env_optional, ConfigError, RemotePage, DEFAULT_PAGE_FIELD, DEFAULT_TIMEOUT_MS};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "actprogress.json";
pub(crate) const DEFAULT_SECTIONS_FILE: &str = "data/acts.json";
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) sections: PathBuf,
    pub(crate) source: Option<String>,
    pub(crate) page_field: String,
    pub(crate) bind: String,
    pub(crate) port: u16,
    pub(crate) timeout_ms: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            sections: PathBuf::from(DEFAULT_SECTIONS_FILE),
            source: None,
            page_field: DEFAULT_PAGE_FIELD.to_string(),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FileConfig {
    /// Remote page source, when one is configured.
    pub(crate) fn remote_source(&self) -> Option<RemotePage> {
        self.source.as_ref().map(|url| {
            RemotePage::new(url.clone())
                .with_field(self.page_field.clone())
                .with_timeout(Duration::from_millis(self.timeout_ms))
        })
    }
}

/// Loads the config at `path`. A missing file yields the defaults; an
/// unreadable or malformed one is an error.
pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&data).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies `ACTPROGRESS_*` environment overrides on top of the file config.
pub(crate) fn apply_env_overrides(config: &mut FileConfig) -> Result<(), ConfigError> {
    apply_overrides(config, env_optional)
}

fn apply_overrides(
    config: &mut FileConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(sections) = lookup("ACTPROGRESS_SECTIONS") {
        config.sections = PathBuf::from(sections);
    }
    if let Some(source) = lookup("ACTPROGRESS_SOURCE") {
        config.source = Some(source);
    }
    if let Some(bind) = lookup("ACTPROGRESS_BIND") {
        config.bind = bind;
    }
    if let Some(port) = lookup("ACTPROGRESS_PORT") {
        config.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "ACTPROGRESS_PORT".to_string(),
            value: port,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file_config(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.remote_source().is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "source": "https://example.com/hs.json", "port": 9000 }"#,
        )
        .unwrap();
        let config = load_file_config(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.page_field, DEFAULT_PAGE_FIELD);

        let remote = config.remote_source().unwrap();
        assert_eq!(remote.url, "https://example.com/hs.json");
        assert_eq!(remote.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "{ port: nope").unwrap();
        assert!(matches!(
            load_file_config(&path),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ACTPROGRESS_SECTIONS", "/etc/acts.json"),
            ("ACTPROGRESS_SOURCE", "https://example.com/p.json"),
            ("ACTPROGRESS_PORT", "3000"),
        ]);
        let mut config = FileConfig::default();
        apply_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.sections, PathBuf::from("/etc/acts.json"));
        assert_eq!(config.source.as_deref(), Some("https://example.com/p.json"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let mut config = FileConfig::default();
        let err = apply_overrides(&mut config, |name| {
            (name == "ACTPROGRESS_PORT").then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }
}
