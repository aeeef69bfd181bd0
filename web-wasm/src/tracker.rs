//! 応募記録の同期
//!
//! 強調した送信ボタンを利用者自身が押したときだけ、応募記録をトラッカーへ送る。
//! ページ側スクリプトによる合成クリックは無視する。
//! リスナーはクリックを観察するだけで、既定動作を止めたり発火したりしない。

use crate::api::Backend;
use crate::page::{is_user_action, WebPage};
use sidekick_common::{FlaggedControl, TrackingRecord};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

/// ISO 8601 文字列の日付部分
pub fn iso_date(iso: &str) -> String {
    iso.split('T').next().unwrap_or_default().to_string()
}

fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso_date(&iso)
}

pub fn observe_submits(page: &WebPage, flagged: &[FlaggedControl<Element>], backend: &Backend) {
    for control in flagged {
        let page = page.clone();
        let backend = backend.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if !is_user_action(&event) {
                tracing::debug!("合成クリックのため応募記録を送りません");
                return;
            }
            let record = TrackingRecord::from_page(&page, today());
            let backend = backend.clone();
            spawn_local(async move {
                match backend.sync_tracker(&record).await {
                    Ok(()) => tracing::info!("応募記録を同期: {} / {}", record.company, record.title),
                    Err(e) => tracing::warn!("Sidekick Tracker Sync Failed: {:?}", e),
                }
            });
        }) as Box<dyn FnMut(_)>);

        let _ = control
            .element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(iso_date("2026-10-18T09:30:00.000Z"), "2026-10-18");
        assert_eq!(iso_date(""), "");
    }
}
