use anyhow::{Context, Result};
use finalyser_chat::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_finalyser_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    /// OpenAI-compatible service root, without `/v1/...`
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key; the key itself is never written here
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
}

impl Default for ChatSection {
    fn default() -> Self {
        let upstream = UpstreamConfig::default();
        Self {
            base_url: upstream.base_url,
            model: upstream.model,
            api_key_env: upstream.api_key_env,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

impl Config {
    /// Upstream settings with the key resolved from the environment
    pub fn upstream_config(&self) -> UpstreamConfig {
        let api_key = std::env::var(&self.chat.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::debug!(var = %self.chat.api_key_env, "no API key in environment");
        }
        UpstreamConfig {
            base_url: self.chat.base_url.clone(),
            model: self.chat.model.clone(),
            api_key,
            api_key_env: self.chat.api_key_env.clone(),
        }
    }

    /// Contents of `path`, or the defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }

    /// Write the config unless `path` already holds one; returns whether it wrote
    pub fn write_new(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        fs::write(path, self.to_toml()?).with_context(|| format!("write {}", path.display()))?;
        Ok(true)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finalyser_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    Config::load_from(&config_path()?)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if Config::default().write_new(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = Config::load_from(&p)?;
    let source = if p.exists() { p.display().to_string() } else { "defaults".to_string() };
    println!("# {source}");
    print!("{}", cfg.to_toml()?);
    let key_state = if cfg.upstream_config().api_key.is_some() { "set" } else { "missing" };
    println!("\n# {} is {key_state}", cfg.chat.api_key_env);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str("[chat]\nmodel = \"llama3\"\n").unwrap();
        assert_eq!(cfg.chat.model, "llama3");
        assert_eq!(cfg.chat.base_url, "https://api.openai.com");
        assert_eq!(cfg.chat.api_key_env, "FINALYSER_API_KEY");
        assert_eq!(cfg.server.bind, "127.0.0.1:8787");
    }

    #[test]
    fn test_default_round_trips() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("[server]"));
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.server.bind, "127.0.0.1:8787");
    }

    #[test]
    fn test_write_new_then_load_from_file() {
        let dir = std::env::temp_dir().join(format!("finalyser-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::remove_file(&path).ok();

        assert_eq!(Config::load_from(&path).unwrap().server.bind, "127.0.0.1:8787");

        let mut cfg = Config::default();
        cfg.server.bind = "0.0.0.0:9000".to_string();
        assert!(cfg.write_new(&path).unwrap());
        assert!(!Config::default().write_new(&path).unwrap());
        assert_eq!(Config::load_from(&path).unwrap().server.bind, "0.0.0.0:9000");

        fs::write(&path, "[server\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_upstream_key_comes_from_named_variable() {
        let mut cfg = Config::default();
        cfg.chat.api_key_env = "FINALYSER_TEST_KEY_UNSET_9F2".to_string();
        let upstream = cfg.upstream_config();
        assert!(upstream.api_key.is_none());
        assert_eq!(upstream.api_key_env, "FINALYSER_TEST_KEY_UNSET_9F2");
    }
}
