use std::{fs, io, path::Path, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use launcher_core::{
    DataSource, HttpDataSource, MissingDataSource, PlaceholderDataSource, StateOptions,
};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Placeholder,
    Http,
    #[serde(rename = "none")]
    #[value(name = "none")]
    Disabled,
}

impl SourceKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Some(SourceKind::Placeholder),
            "http" => Some(SourceKind::Http),
            "none" => Some(SourceKind::Disabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_source: SourceKind,
    pub api_base_url: Option<String>,
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_source: SourceKind::Placeholder,
            api_base_url: None,
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_source: Option<SourceKind>,
    api_base_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file at `path` if it exists, then environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.data_source {
        settings.data_source = v;
    }
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = Some(v);
    }
    if let Some(v) = file_cfg.fetch_timeout_secs {
        settings.fetch_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    for key in ["LAUNCHER_DATA_SOURCE", "APP__DATA_SOURCE"] {
        if let Some(kind) = var(key).as_deref().and_then(SourceKind::parse) {
            settings.data_source = kind;
        }
    }

    for key in ["LAUNCHER_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = var(key) {
            settings.api_base_url = Some(v);
        }
    }

    if let Some(v) = var("APP__FETCH_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.fetch_timeout_secs = parsed;
        }
    }
}

impl Settings {
    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn build_source(&self) -> anyhow::Result<Arc<dyn DataSource>> {
        Ok(match self.data_source {
            SourceKind::Placeholder => Arc::new(PlaceholderDataSource),
            SourceKind::Disabled => Arc::new(MissingDataSource),
            SourceKind::Http => {
                let Some(base_url) = self.api_base_url.as_deref() else {
                    bail!("data_source = \"http\" requires api_base_url");
                };
                let source = HttpDataSource::new(base_url)
                    .with_context(|| format!("invalid api_base_url '{base_url}'"))?;
                Arc::new(source)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn missing_file_yields_placeholder_defaults() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("launcher_missing_{suffix}.toml"));

        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.fetch_timeout_secs, Settings::default().fetch_timeout_secs);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            r#"
                data_source = "http"
                api_base_url = "https://launcher.example/api/v1"
                fetch_timeout_secs = 5
            "#,
        )
        .expect("apply");

        assert_eq!(
            settings,
            Settings {
                data_source: SourceKind::Http,
                api_base_url: Some("https://launcher.example/api/v1".into()),
                fetch_timeout_secs: 5,
            }
        );
    }

    #[test]
    fn unknown_source_in_file_is_rejected() {
        let mut settings = Settings::default();
        assert!(apply_file(&mut settings, r#"data_source = "carrier-pigeon""#).is_err());
    }

    #[test]
    fn settings_file_on_disk_is_read() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("launcher_settings_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join("launcher.toml");
        fs::write(&path, "fetch_timeout_secs = 12\n").expect("write");

        let mut settings = Settings::default();
        apply_file(&mut settings, &fs::read_to_string(&path).expect("read")).expect("apply");
        assert_eq!(settings.fetch_timeout_secs, 12);
        assert!(load_settings(&path).is_ok());

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[test]
    fn app_prefixed_env_wins_over_plain_env() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env_of(&[
                ("LAUNCHER_DATA_SOURCE", "none"),
                ("APP__DATA_SOURCE", "HTTP"),
                ("LAUNCHER_API_URL", "http://plain"),
                ("APP__API_BASE_URL", "http://prefixed"),
                ("APP__FETCH_TIMEOUT_SECS", "9"),
            ]),
        );

        assert_eq!(settings.data_source, SourceKind::Http);
        assert_eq!(settings.api_base_url.as_deref(), Some("http://prefixed"));
        assert_eq!(settings.fetch_timeout_secs, 9);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env_of(&[
                ("APP__DATA_SOURCE", "ftp"),
                ("APP__FETCH_TIMEOUT_SECS", "soon"),
            ]),
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn http_source_requires_a_valid_base_url() {
        let mut settings = Settings {
            data_source: SourceKind::Http,
            ..Settings::default()
        };
        assert!(settings.build_source().is_err());

        settings.api_base_url = Some("not a url".into());
        assert!(settings.build_source().is_err());

        settings.api_base_url = Some("http://127.0.0.1:9/api".into());
        assert!(settings.build_source().is_ok());
    }

    #[test]
    fn timeout_feeds_state_options() {
        let settings = Settings {
            fetch_timeout_secs: 3,
            ..Settings::default()
        };
        assert_eq!(settings.state_options().fetch_timeout, Duration::from_secs(3));
    }
}
