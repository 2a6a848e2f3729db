//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys use `__`, e.g. `APP_SERVER__PORT=8080`). `Settings` pulls the
//! keys this workspace reads, with defaults for anything unset.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::PathBuf;

use crate::digest::hasher_by_name;
use crate::types::DEFAULT_TOP_K;

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like `get`, but a missing key yields `default`. A present key with the
    /// wrong type is still an error.
    pub fn get_or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(default);
        }
        self.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub model_id: String,
    pub model_dir: Option<PathBuf>,
    /// `auto`, `cpu` or `metal`.
    pub device: String,
    pub use_fake_embeddings: bool,
    pub fake_dim: usize,
    pub default_top_k: usize,
    pub digest: String,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./data/apps.json"),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_dir: None,
            device: "auto".to_string(),
            use_fake_embeddings: false,
            fake_dim: 384,
            default_top_k: DEFAULT_TOP_K,
            digest: "sha256".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let d = Settings::default();
        let store_path: String = config.get_or("data.store_path", d.store_path.to_string_lossy().into_owned())?;
        let model_dir: Option<String> = config.get_or("embedding.model_dir", None)?;
        let settings = Settings {
            store_path: expand_path(store_path),
            model_id: config.get_or("embedding.model_id", d.model_id)?,
            model_dir: model_dir.map(expand_path),
            device: config.get_or("embedding.device", d.device)?,
            use_fake_embeddings: config.get_or("embedding.use_fake", d.use_fake_embeddings)?,
            fake_dim: config.get_or("embedding.fake_dim", d.fake_dim)?,
            default_top_k: config.get_or("search.default_top_k", d.default_top_k)?,
            digest: config.get_or("index.digest", d.digest)?,
            host: config.get_or("server.host", d.host)?,
            port: config.get_or("server.port", d.port)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_k == 0 {
            anyhow::bail!("search.default_top_k must be at least 1");
        }
        if self.fake_dim == 0 {
            anyhow::bail!("embedding.fake_dim must be at least 1");
        }
        hasher_by_name(&self.digest)?;
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
