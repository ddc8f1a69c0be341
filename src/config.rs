use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::SocketAddr;

use chrono_tz::Tz;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_HOST: &str = "localhost";
pub const DEFAULT_OG_IMAGE_URL: &str = "https://og-image.vercel.app";
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Raw key/value pairs from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn default_max_tokens(self) -> u32 {
        match self {
            ProviderKind::OpenAI => 300,
            ProviderKind::Anthropic => 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub api_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Typed settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub timezone: Tz,
    pub bind_addr: SocketAddr,
    pub public_host: String,
    pub og_image_url: Url,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_source(|key| config.lookup(key))
    }

    /// Builds settings from any key lookup, e.g. a file without env fallback.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("HISTORY_PROVIDER") {
            None => ProviderKind::OpenAI,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "openai" => ProviderKind::OpenAI,
                "anthropic" => ProviderKind::Anthropic,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "HISTORY_PROVIDER",
                        value,
                    });
                }
            },
        };

        let (key_name, url_name) = match kind {
            ProviderKind::OpenAI => ("OPENAI_API_KEY", "OPENAI_API_URL"),
            ProviderKind::Anthropic => ("ANTHROPIC_API_KEY", "ANTHROPIC_API_URL"),
        };
        let api_key = lookup(key_name).ok_or(ConfigError::Missing(key_name))?;

        let max_tokens = match lookup("HISTORY_MAX_TOKENS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HISTORY_MAX_TOKENS",
                value,
            })?,
            None => kind.default_max_tokens(),
        };
        let temperature = match lookup("HISTORY_TEMPERATURE") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HISTORY_TEMPERATURE",
                value,
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let timezone = match lookup("HISTORY_TIMEZONE") {
            Some(value) => value.parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
                key: "HISTORY_TIMEZONE",
                value,
            })?,
            None => Tz::UTC,
        };

        let bind_value = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_value
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let image_value = lookup("OG_IMAGE_URL")
            .unwrap_or_else(|| DEFAULT_OG_IMAGE_URL.to_string());
        let og_image_url = Url::parse(&image_value)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ConfigError::InvalidValue {
                key: "OG_IMAGE_URL",
                value: image_value,
            })?;

        Ok(Self {
            provider: ProviderSettings {
                kind,
                api_key,
                api_url: lookup(url_name),
                model: lookup("HISTORY_MODEL")
                    .unwrap_or_else(|| kind.default_model().to_string()),
                max_tokens,
                temperature,
            },
            timezone,
            bind_addr,
            public_host: lookup("PUBLIC_HOST")
                .unwrap_or_else(|| DEFAULT_PUBLIC_HOST.to_string()),
            og_image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_settings(config: &AppConfig) -> Result<Settings, ConfigError> {
        Settings::from_source(|key| config.get(key).filter(|value| !value.trim().is_empty()))
    }

    #[test]
    fn parses_comments_exports_and_quotes() {
        let config = AppConfig::parse(
            "# provider\nexport HISTORY_PROVIDER=anthropic\nANTHROPIC_API_KEY=\"abc\"\n\nPUBLIC_HOST='frames.example'\n",
        )
        .unwrap();
        assert_eq!(config.get("HISTORY_PROVIDER").as_deref(), Some("anthropic"));
        assert_eq!(config.get("ANTHROPIC_API_KEY").as_deref(), Some("abc"));
        assert_eq!(config.get("PUBLIC_HOST").as_deref(), Some("frames.example"));
    }

    #[test]
    fn rejects_line_without_equals() {
        let err = AppConfig::parse("OK=1\nnot a pair\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn anthropic_settings_use_provider_defaults() {
        let config = AppConfig::parse(
            "HISTORY_PROVIDER=anthropic\nANTHROPIC_API_KEY=k\nHISTORY_TIMEZONE=America/New_York\nBIND_ADDR=127.0.0.1:8080\n",
        )
        .unwrap();
        let settings = file_settings(&config).unwrap();
        assert_eq!(settings.provider.kind, ProviderKind::Anthropic);
        assert_eq!(settings.provider.max_tokens, 1024);
        assert_eq!(settings.provider.model, "claude-3-5-haiku-latest");
        assert_eq!(settings.timezone, chrono_tz::America::New_York);
        assert_eq!(settings.bind_addr.port(), 8080);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = AppConfig::parse("HISTORY_PROVIDER=llama\n").unwrap();
        let err = file_settings(&config).unwrap_err();
        assert!(err.to_string().contains("HISTORY_PROVIDER"));
    }

    #[test]
    fn bad_temperature_is_rejected() {
        let config =
            AppConfig::parse("HISTORY_PROVIDER=openai\nOPENAI_API_KEY=k\nHISTORY_TEMPERATURE=hot\n")
                .unwrap();
        let err = file_settings(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "HISTORY_TEMPERATURE",
                ..
            }
        ));
    }

    #[test]
    fn file_values_take_precedence_over_defaults() {
        let config = AppConfig::parse(
            "OPENAI_API_KEY=k\nHISTORY_MODEL=gpt-4o\nHISTORY_MAX_TOKENS=512\nOG_IMAGE_URL=https://og.example/render\n",
        )
        .unwrap();
        let settings = file_settings(&config).unwrap();
        assert_eq!(settings.provider.kind, ProviderKind::OpenAI);
        assert_eq!(settings.provider.model, "gpt-4o");
        assert_eq!(settings.provider.max_tokens, 512);
        assert_eq!(settings.og_image_url.as_str(), "https://og.example/render");
        assert_eq!(settings.public_host, DEFAULT_PUBLIC_HOST);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = AppConfig::parse("HISTORY_PROVIDER=openai\n").unwrap();
        let err = file_settings(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }
}
