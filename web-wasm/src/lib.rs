//! Sidekick Content Script (Leptos + WASM)
//!
//! 求人応募フォームに注入され、保存済みプロフィールで空欄を埋める。
//! 送信ボタンは強調するだけで押さない。

mod api;
mod components;
mod content_script;
mod logging;
mod page;
mod storage;
mod tracker;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    tracing::info!("Sidekick: content script injected");
    wasm_bindgen_futures::spawn_local(content_script::run());
}
