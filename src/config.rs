//! アプリケーション設定（環境変数から読み込み）

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::error::Error;

pub const DEBUG_ENV: &str = "PATHWRIGHT_DEBUG";
pub const PERMANENT_REDIRECT_ENV: &str = "PATHWRIGHT_PERMANENT_REDIRECT";
pub const STATIC_URL_ENV: &str = "PATHWRIGHT_STATIC_URL";
pub const STATIC_DIR_ENV: &str = "PATHWRIGHT_STATIC_DIR";
pub const HOST_ENV: &str = "PATHWRIGHT_HOST";
pub const PORT_ENV: &str = "PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// デバッグモード（静的ファイル配信と詳細ログを有効化）
    pub debug: bool,
    /// 末尾スラッシュ補完のリダイレクトを301にする
    pub permanent_redirect: bool,
    /// 静的ファイルのURLプレフィックス（例: "/static/"）
    pub static_url: Option<String>,
    /// 静的ファイルのディレクトリ
    pub static_dir: Option<PathBuf>,
    /// 待ち受けホスト
    pub host: String,
    /// 待ち受けポート
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            permanent_redirect: false,
            static_url: None,
            static_dir: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// 環境変数から設定を読み込む（不正な値は既定値にフォールバック）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debug: env_flag(DEBUG_ENV).unwrap_or(defaults.debug),
            permanent_redirect: env_flag(PERMANENT_REDIRECT_ENV).unwrap_or(defaults.permanent_redirect),
            static_url: env_string(STATIC_URL_ENV),
            static_dir: env_string(STATIC_DIR_ENV).map(PathBuf::from),
            host: env_string(HOST_ENV).unwrap_or(defaults.host),
            port: env_port(PORT_ENV).unwrap_or(defaults.port),
        }
    }

    /// 静的ファイル配信が有効か（デバッグかつURLとディレクトリが両方設定済み）
    pub fn static_enabled(&self) -> bool {
        self.debug && self.static_url.is_some() && self.static_dir.is_some()
    }

    /// 設定値の整合性を検証
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(url) = &self.static_url {
            if !url.starts_with('/') {
                return Err(Error::ConfigurationError(format!(
                    "static URL must start with '/': {}",
                    url
                )));
            }
        }
        if self.static_url.is_some() != self.static_dir.is_some() {
            warn!("Static files need both {} and {}; static serving disabled", STATIC_URL_ENV, STATIC_DIR_ENV);
        }
        if self.host.is_empty() {
            return Err(Error::ConfigurationError("host must not be empty".to_string()));
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env_string(name)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring invalid boolean for {}: {}", name, other);
            None
        }
    }
}

fn env_port(name: &str) -> Option<u16> {
    let value = env_string(name)?;
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Some(port),
        _ => {
            warn!("Ignoring invalid port for {}: {}", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 6] = [
        DEBUG_ENV,
        PERMANENT_REDIRECT_ENV,
        STATIC_URL_ENV,
        STATIC_DIR_ENV,
        HOST_ENV,
        PORT_ENV,
    ];

    #[test]
    fn test_defaults_without_env() {
        let unset: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|k| (*k, None)).collect();
        temp_env::with_vars(unset, || {
            let config = AppConfig::from_env();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8000);
            assert!(!config.static_enabled());
        });
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                (DEBUG_ENV, Some("true")),
                (PERMANENT_REDIRECT_ENV, Some("1")),
                (STATIC_URL_ENV, Some("/static/")),
                (STATIC_DIR_ENV, Some("/srv/static")),
                (HOST_ENV, Some("0.0.0.0")),
                (PORT_ENV, Some("9090")),
            ],
            || {
                let config = AppConfig::from_env();
                assert!(config.debug);
                assert!(config.permanent_redirect);
                assert_eq!(config.static_url.as_deref(), Some("/static/"));
                assert_eq!(config.static_dir, Some(PathBuf::from("/srv/static")));
                assert_eq!(config.host, "0.0.0.0");
                assert_eq!(config.port, 9090);
                assert!(config.static_enabled());
            },
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        temp_env::with_vars(
            [
                (DEBUG_ENV, Some("maybe")),
                (PERMANENT_REDIRECT_ENV, Some("off")),
                (PORT_ENV, Some("99999")),
                (HOST_ENV, Some("   ")),
            ],
            || {
                let config = AppConfig::from_env();
                assert!(!config.debug);
                assert!(!config.permanent_redirect);
                assert_eq!(config.port, 8000);
                assert_eq!(config.host, "127.0.0.1");
            },
        );
    }

    #[test]
    fn test_static_requires_debug_and_both_settings() {
        let mut config = AppConfig {
            static_url: Some("/static/".to_string()),
            static_dir: Some(PathBuf::from("static")),
            ..AppConfig::default()
        };
        assert!(!config.static_enabled());

        config.debug = true;
        assert!(config.static_enabled());

        config.static_dir = None;
        assert!(!config.static_enabled());
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let config = AppConfig {
            static_url: Some("static/".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigurationError(_))));

        let config = AppConfig {
            host: String::new(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
