use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use skimtube_core::Provider;

const LOCAL_CONFIG_FILE: &str = "skimtube.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,

    pub provider: Provider,
    // Overrides for the provider's built-in model and endpoint.
    pub model: Option<String>,
    pub api_url: Option<String>,
    // Read only when the provider's environment variable is unset.
    pub key_file: PathBuf,

    // Caption language codes in preference order.
    pub languages: Vec<String>,
    pub html_links: bool,
    pub default_chunk_minutes: u32,
    pub summary_concurrency: usize,

    pub log_filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppConfigFile {
    listen_addr: Option<String>,

    provider: Option<Provider>,
    model: Option<String>,
    api_url: Option<String>,
    key_file: Option<String>,

    languages: Option<Vec<String>>,
    html_links: Option<bool>,
    default_chunk_minutes: Option<u32>,
    summary_concurrency: Option<usize>,

    log_filter: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let s = s.trim().to_string();
        if s.is_empty() { None } else { Some(s) }
    })
}

impl AppConfig {
    /// Load `path` if given (it must exist), else the first config file found
    /// in the working directory or the user config dir, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::candidates().into_iter().find(|candidate| candidate.is_file()),
        };

        let Some(path) = path else {
            return Self::from_file(AppConfigFile::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let file: AppConfigFile = toml::from_str(raw).context("Failed to parse TOML")?;
        Self::from_file(file)
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("skimtube").join("config.toml"));
        }
        candidates
    }

    fn from_file(file: AppConfigFile) -> Result<Self> {
        let languages: Vec<String> = file
            .languages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|language| non_blank(Some(language)))
            .collect();

        let cfg = Self {
            listen_addr: non_blank(file.listen_addr).unwrap_or_else(|| "0.0.0.0:5000".to_string()),

            provider: file.provider.unwrap_or_default(),
            model: non_blank(file.model),
            api_url: non_blank(file.api_url),
            key_file: PathBuf::from(
                non_blank(file.key_file).unwrap_or_else(|| ".secrets/openai.key".to_string()),
            ),

            languages: if languages.is_empty() {
                vec!["en".to_string()]
            } else {
                languages
            },
            html_links: file.html_links.unwrap_or(true),
            default_chunk_minutes: file.default_chunk_minutes.unwrap_or(2),
            summary_concurrency: file.summary_concurrency.unwrap_or(1),

            log_filter: non_blank(file.log_filter).unwrap_or_else(|| "info".to_string()),
        };

        if cfg.default_chunk_minutes == 0 {
            return Err(anyhow!("default_chunk_minutes must be at least 1"));
        }
        if cfg.summary_concurrency == 0 {
            return Err(anyhow!("summary_concurrency must be at least 1"));
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::parse("").unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
        assert_eq!(cfg.provider, Provider::Openai);
        assert_eq!(cfg.model, None);
        assert_eq!(cfg.api_url, None);
        assert_eq!(cfg.key_file, PathBuf::from(".secrets/openai.key"));
        assert_eq!(cfg.languages, vec!["en"]);
        assert!(cfg.html_links);
        assert_eq!(cfg.default_chunk_minutes, 2);
        assert_eq!(cfg.summary_concurrency, 1);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn every_key_can_be_set() {
        let cfg = AppConfig::parse(
            r#"
            listen_addr = "127.0.0.1:8080"
            provider = "gemini"
            model = "gemini-2.0-flash"
            api_url = "http://localhost:9000/v1/chat/completions"
            key_file = "/run/secrets/gemini"
            languages = ["de", " ", "en"]
            html_links = false
            default_chunk_minutes = 5
            summary_concurrency = 4
            log_filter = "skimtube=debug"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.listen_addr, "127.0.0.1:8080");
        assert_eq!(cfg.provider, Provider::Gemini);
        assert_eq!(cfg.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(
            cfg.api_url.as_deref(),
            Some("http://localhost:9000/v1/chat/completions")
        );
        assert_eq!(cfg.key_file, PathBuf::from("/run/secrets/gemini"));
        assert_eq!(cfg.languages, vec!["de", "en"]);
        assert!(!cfg.html_links);
        assert_eq!(cfg.default_chunk_minutes, 5);
        assert_eq!(cfg.summary_concurrency, 4);
        assert_eq!(cfg.log_filter, "skimtube=debug");
    }

    #[test]
    fn blank_strings_fall_back_to_defaults() {
        let cfg = AppConfig::parse("model = \"  \"\nlisten_addr = \"\"").unwrap();
        assert_eq!(cfg.model, None);
        assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(AppConfig::parse("default_chunk_minutes = 0").is_err());
        assert!(AppConfig::parse("summary_concurrency = 0").is_err());
    }

    #[test]
    fn unknown_provider_and_keys_are_rejected() {
        assert!(AppConfig::parse("provider = \"llama\"").is_err());
        assert!(AppConfig::parse("listen = \"0.0.0.0:1\"").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let missing = Path::new("/definitely/not/here/skimtube.toml");
        let err = AppConfig::load(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
