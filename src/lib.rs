//! sidekick CLI
//!
//! 保存したフォームでの入力プレビュー、プロフィール管理、バックエンド経由の
//! 相性診断・文章生成を提供する。入力エンジン本体は `sidekick-common` にある。

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod job_text;
pub mod logging;
pub mod preview;
pub mod profile_store;
