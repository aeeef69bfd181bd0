//! エンジン設定
//!
//! 待機時間やジョブ記述の文字数上限など、CLIとコンテンツスクリプトで共有する値。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// バックエンドの既定URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// セッションIDが未設定の場合に使うID
pub const DEFAULT_SESSION_ID: &str = "demo-session";

/// 自動入力エンジンの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// ページ読み込み後、入力開始までの待機（SPAの遅延描画対策）
    pub initial_settle_ms: u64,
    /// 「追加」ボタン押下後、ブロック描画を待つ時間
    pub block_settle_ms: u64,
    /// AIへ送るジョブ記述の最大文字数
    pub max_job_description_chars: usize,
    /// これより短いジョブ記述は解析しない
    pub min_job_description_chars: usize,
    pub backend_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_settle_ms: 1000,
            block_settle_ms: 300,
            max_job_description_chars: 5000,
            min_job_description_chars: 100,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl EngineConfig {
    /// 待機なし設定（テスト・オフラインプレビュー用）
    pub fn immediate() -> Self {
        Self {
            initial_settle_ms: 0,
            block_settle_ms: 0,
            ..Self::default()
        }
    }

    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    pub fn block_settle(&self) -> Duration {
        Duration::from_millis(self.block_settle_ms)
    }

    /// JSON文字列から読み込み（欠けた項目は既定値）
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_settle(), Duration::from_millis(1000));
        assert_eq!(config.block_settle(), Duration::from_millis(300));
        assert_eq!(config.max_job_description_chars, 5000);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"blockSettleMs": 50}"#).unwrap();
        assert_eq!(config.block_settle_ms, 50);
        assert_eq!(config.initial_settle_ms, 1000);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_immediate_has_no_delay() {
        let config = EngineConfig::immediate();
        assert_eq!(config.initial_settle(), Duration::ZERO);
        assert_eq!(config.block_settle(), Duration::ZERO);
    }
}
