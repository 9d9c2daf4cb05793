//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys come from double underscores: `APP_PINNING__LOOKUP_BUDGET_MS=20`.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

/// The `[pinning]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinningSettings {
    pub store_path: String,
    pub lookup_budget_ms: u64,
    pub max_position: u32,
    pub max_in_flight_lookups: usize,
}

impl Default for PinningSettings {
    fn default() -> Self {
        Self {
            store_path: "pins.json".to_string(),
            lookup_budget_ms: 50,
            max_position: 100,
            max_in_flight_lookups: 4,
        }
    }
}

impl PinningSettings {
    pub fn lookup_budget(&self) -> Duration {
        Duration::from_millis(self.lookup_budget_ms)
    }

    /// Store path with relative values anchored at `base`, usually the
    /// directory the config files were read from.
    pub fn resolve_store_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.store_path)
    }
}

impl Config {
    /// Load from the working directory.
    pub fn load() -> anyhow::Result<Self> {
        let cwd = env::current_dir()?;
        Self::load_from(&cwd)
    }

    /// Load `config.toml` and the `RUST_ENV` overlay from `dir`, then `APP_*` env vars.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment, base_dir: PathBuf::from(".") }
    }

    /// Directory relative settings paths are anchored at.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Pinning settings, falling back to defaults when the section is absent.
    pub fn pinning(&self) -> anyhow::Result<PinningSettings> {
        if self.figment.find_value("pinning").is_err() {
            return Ok(PinningSettings::default());
        }
        let settings: PinningSettings = self.get("pinning")?;
        if settings.max_position == 0 {
            anyhow::bail!("pinning.max_position must be at least 1");
        }
        if settings.max_in_flight_lookups == 0 {
            anyhow::bail!("pinning.max_in_flight_lookups must be at least 1");
        }
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.pinning()?;
        match env {
            "prod" | "production" if settings.lookup_budget_ms == 0 => {
                anyhow::bail!("pinning.lookup_budget_ms must be non-zero in production")
            }
            _ => {}
        }
        Ok(())
    }
}

/// `$VAR`/`${VAR}` and a leading `~` expanded; unknown variables are left as written.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_vars = shellexpand::env(raw).unwrap_or(Cow::Borrowed(raw));
    PathBuf::from(shellexpand::tilde(&with_vars).as_ref())
}

/// Expanded `path`, joined onto `base` unless it is already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, path: S) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
