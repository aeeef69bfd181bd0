//! ジョブ記述の読み込み
//!
//! 保存した求人ページ（.html/.htm）なら本文コンテナから抜き出し、
//! それ以外はテキストファイルとしてそのまま読む。

use crate::error::{Result, SidekickError};
use sidekick_common::dom::normalize_text;
use sidekick_common::jobs::truncate_chars;
use sidekick_common::{scrape_job_description, EngineConfig, MemoryPage};
use std::path::Path;

pub fn load_job_description(path: &Path, config: &EngineConfig) -> Result<String> {
    if !path.exists() {
        return Err(SidekickError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "html" | "htm"))
        .unwrap_or(false);

    let text = if is_html {
        let page = MemoryPage::from_html(&content);
        scrape_job_description(
            &page,
            config.max_job_description_chars,
            config.min_job_description_chars,
        )
    } else {
        let text = normalize_text(&content);
        (text.chars().count() >= config.min_job_description_chars)
            .then(|| truncate_chars(&text, config.max_job_description_chars).to_string())
    };

    text.ok_or_else(|| {
        SidekickError::Engine(format!(
            "ジョブ記述が短すぎます（{}文字以上必要）: {}",
            config.min_job_description_chars,
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plain_text_is_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "Rust engineer  wanted.\n".repeat(400)).unwrap();

        let text = load_job_description(&path, &EngineConfig::default()).unwrap();
        assert_eq!(text.chars().count(), 5000);
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_short_text_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "Too short").unwrap();

        let err = load_job_description(&path, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, SidekickError::Engine(_)));
    }

    #[test]
    fn test_html_uses_description_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posting.html");
        let body = "We build reliable distributed systems in Rust. ".repeat(5);
        std::fs::write(
            &path,
            format!(r#"<body><nav>Menu</nav><div class="job-description">{}</div></body>"#, body),
        )
        .unwrap();

        let text = load_job_description(&path, &EngineConfig::default()).unwrap();
        assert!(text.starts_with("We build reliable"));
        assert!(!text.contains("Menu"));
    }
}
