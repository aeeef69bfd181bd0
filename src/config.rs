use crate::error::{Result, SidekickError};
use serde::{Deserialize, Serialize};
use sidekick_common::{DEFAULT_BACKEND_URL, DEFAULT_SESSION_ID};
use std::path::{Path, PathBuf};

/// バックエンドURLを上書きする環境変数
pub const BACKEND_URL_ENV: &str = "SIDEKICK_BACKEND_URL";
/// セッションIDを上書きする環境変数
pub const SESSION_ID_ENV: &str = "SIDEKICK_SESSION_ID";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub session_id: Option<String>,
    pub profile_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（なければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SidekickError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sidekick"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// バックエンドURL（環境変数 > 設定ファイル > 既定値）
    pub fn backend_url(&self) -> String {
        resolve(BACKEND_URL_ENV, self.backend_url.as_deref(), DEFAULT_BACKEND_URL)
    }

    /// セッションID（環境変数 > 設定ファイル > 既定値）
    pub fn session_id(&self) -> String {
        resolve(SESSION_ID_ENV, self.session_id.as_deref(), DEFAULT_SESSION_ID)
    }

    /// プロフィールの場所（引数 > 設定ファイル > ~/.config/sidekick/profile.json）
    pub fn profile_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match &self.profile_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("profile.json")),
        }
    }
}

fn resolve(env_key: &str, configured: Option<&str>, default: &str) -> String {
    std::env::var(env_key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.filter(|v| !v.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| default.to_string())
}
