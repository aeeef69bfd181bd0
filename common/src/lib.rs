//! Sidekick Common Library
//!
//! CLIとコンテンツスクリプト(WASM)で共有する自動入力エンジン。
//! ページには [`dom::Page`] 越しにだけ触れ、フォームの送信は一切行わない。

pub mod blocks;
pub mod classifier;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod guard;
pub mod jobs;
pub mod orchestrator;
pub mod profile;
pub mod replicator;
pub mod resolver;
pub mod rules;

pub use blocks::BlockKind;
pub use config::{EngineConfig, DEFAULT_BACKEND_URL, DEFAULT_SESSION_ID};
pub use dom::{Clock, MemoryPage, NoDelay, Page};
pub use error::{Error, Result};
pub use guard::FlaggedControl;
pub use jobs::{scrape_job_description, Endpoint, JobAnalysis, TrackingRecord};
pub use orchestrator::{FillOutcome, FillPass, FillReport, Notifier, PassState};
pub use profile::{Answer, Profile};
