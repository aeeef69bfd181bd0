//! Sidekick バックエンド連携

pub mod backend;

pub use backend::Backend;
