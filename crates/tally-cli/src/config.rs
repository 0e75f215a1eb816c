// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_app::{CSRF_COOKIE, NotifyMode};
use tally_ui::PageSettings;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "tally";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_UI_DELAY: &str = "3s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: Server::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub csrf_cookie: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            csrf_cookie: Some(CSRF_COOKIE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub notification_timeout: Option<String>,
    pub notification_mode: Option<String>,
    pub redirect_delay: Option<String>,
    pub options_auto_hide: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            notification_timeout: Some(DEFAULT_UI_DELAY.to_owned()),
            notification_mode: Some(NotifyMode::Replace.as_str().to_owned()),
            redirect_delay: Some(DEFAULT_UI_DELAY.to_owned()),
            options_auto_hide: Some(DEFAULT_UI_DELAY.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TALLY_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TALLY_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [server] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let base_url = self.base_url();
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("server.base_url in {} is not a URL", path.display()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "server.base_url in {} must use http or https, got {:?}",
                path.display(),
                base_url
            );
        }

        if self.csrf_cookie().trim().is_empty() {
            bail!("server.csrf_cookie in {} must not be empty", path.display());
        }

        let durations = [
            ("server.timeout", self.server.timeout.as_deref()),
            ("ui.notification_timeout", self.ui.notification_timeout.as_deref()),
            ("ui.redirect_delay", self.ui.redirect_delay.as_deref()),
            ("ui.options_auto_hide", self.ui.options_auto_hide.as_deref()),
        ];
        for (key, raw) in durations {
            let Some(raw) = raw else {
                continue;
            };
            let parsed =
                parse_duration(raw).with_context(|| format!("{key} in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "{key} in {} must be positive, got {}",
                    path.display(),
                    raw
                );
            }
        }

        self.notify_mode()
            .with_context(|| format!("ui.notification_mode in {}", path.display()))?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.server.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn csrf_cookie(&self) -> &str {
        self.server.csrf_cookie.as_deref().unwrap_or(CSRF_COOKIE)
    }

    pub fn notify_mode(&self) -> Result<NotifyMode> {
        let raw = self
            .ui
            .notification_mode
            .as_deref()
            .unwrap_or(NotifyMode::Replace.as_str());
        NotifyMode::parse(raw)
            .ok_or_else(|| anyhow!("invalid notification mode {raw:?}; use \"replace\" or \"stack\""))
    }

    pub fn page_settings(&self) -> Result<PageSettings> {
        let delay = |raw: &Option<String>| parse_duration(raw.as_deref().unwrap_or(DEFAULT_UI_DELAY));
        Ok(PageSettings {
            notification_timeout: delay(&self.ui.notification_timeout)?,
            notify_mode: self.notify_mode()?,
            redirect_delay: delay(&self.ui.redirect_delay)?,
            options_auto_hide: delay(&self.ui.options_auto_hide)?,
            csrf_cookie: self.csrf_cookie().to_owned(),
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tally config\n# Place this file at: {}\n\nversion = 1\n\n[server]\nbase_url = \"{}\"\ntimeout = \"{}\"\ncsrf_cookie = \"{}\"\n\n[ui]\nnotification_timeout = \"{}\"\n# \"replace\" keeps one notification on screen; \"stack\" shows them all\nnotification_mode = \"replace\"\nredirect_delay = \"{}\"\noptions_auto_hide = \"{}\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            CSRF_COOKIE,
            DEFAULT_UI_DELAY,
            DEFAULT_UI_DELAY,
            DEFAULT_UI_DELAY,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 3s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;
    use tally_app::NotifyMode;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert_eq!(config.timeout()?, Duration::from_secs(10));

        let settings = config.page_settings()?;
        assert_eq!(settings.notify_mode, NotifyMode::Replace);
        assert_eq!(settings.redirect_delay, Duration::from_secs(3));
        assert_eq!(settings.csrf_cookie, "csrftoken");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[server]\nbase_url=\"http://shop.test\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[server] and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[server]\nbase_url = \"https://shop.test\"\ntimeout = \"500ms\"\ncsrf_cookie = \"shop_csrf\"\n[ui]\nnotification_mode = \"stack\"\nredirect_delay = \"1s\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "https://shop.test");
        assert_eq!(config.timeout()?, Duration::from_millis(500));
        let settings = config.page_settings()?;
        assert_eq!(settings.notify_mode, NotifyMode::Stack);
        assert_eq!(settings.redirect_delay, Duration::from_secs(1));
        assert_eq!(settings.options_auto_hide, Duration::from_secs(3));
        assert_eq!(settings.csrf_cookie, "shop_csrf");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn base_url_must_be_http() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[server]\nbase_url = \"ftp://shop.test\"\n")?;
        let error = Config::load(&path).expect_err("ftp base url should fail");
        assert!(error.to_string().contains("http or https"), "{error}");
        Ok(())
    }

    #[test]
    fn unknown_notification_mode_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nnotification_mode = \"queue\"\n")?;
        let error = Config::load(&path).expect_err("unknown mode should fail");
        assert!(format!("{error:#}").contains("replace"), "{error:#}");
        Ok(())
    }

    #[test]
    fn zero_durations_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nredirect_delay = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero delay should fail");
        let message = error.to_string();
        assert!(message.contains("ui.redirect_delay"), "{message}");
        assert!(message.contains("must be positive"), "{message}");
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("TALLY_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("TALLY_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("TALLY_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("config.toml"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"), "{error}");
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[server]"));
        assert!(example.contains("[ui]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        Ok(())
    }
}
