//! カバーレター欄の「AIで下書き」ボタン
//!
//! 押されたときだけバックエンドに生成を依頼し、欄が空のままなら書き込む。

use crate::api::Backend;
use crate::page::WebPage;
use sidekick_common::events::write_if_empty;
use sidekick_common::jobs::{truncate_chars, TextPurpose};
use sidekick_common::{Page, Profile};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement};

const BUTTON_CLASS: &str = "sk-cl-btn";

const BUTTON_STYLE: &str = "display: block; margin-bottom: 8px; background: linear-gradient(to right, #6366f1, #a855f7); \
    color: white; border: none; padding: 4px 12px; border-radius: 4px; font-size: 12px; font-weight: bold; \
    cursor: pointer; box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);";

const LABEL_IDLE: &str = "✨ Auto-Write Cover Letter ✨";
const LABEL_BUSY: &str = "Writing...";
const LABEL_DONE: &str = "✨ Written ✨";
const LABEL_KEPT: &str = "Field already has text";
const LABEL_ERROR: &str = "Error";

/// textarea の直前にボタンを差し込む（既にあれば何もしない）
pub fn attach(page: &WebPage, textarea: &Element, backend: Backend, profile: Profile, max_chars: usize) {
    let Some(parent) = textarea.parent_element() else {
        return;
    };
    let selector = format!(".{}", BUTTON_CLASS);
    if parent.query_selector(&selector).ok().flatten().is_some() {
        return;
    }

    let Some(button) = page
        .document()
        .create_element("button")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    button.set_class_name(BUTTON_CLASS);
    // フォーム内に置くので type=button でないと送信ボタン扱いになる
    let _ = button.set_attribute("type", "button");
    button.style().set_css_text(BUTTON_STYLE);
    button.set_inner_text(LABEL_IDLE);

    let page = page.clone();
    let target = textarea.clone();
    let label = button.clone();
    let closure = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        ev.prevent_default();
        label.set_inner_text(LABEL_BUSY);

        let page = page.clone();
        let target = target.clone();
        let label = label.clone();
        let backend = backend.clone();
        let profile = profile.clone();
        spawn_local(async move {
            let body = page.body_text();
            let job_description = truncate_chars(&body, max_chars);
            match backend
                .generate_text(TextPurpose::CoverLetter, job_description, &profile)
                .await
            {
                Ok(generated) => {
                    if write_if_empty(&page, &target, &generated.text) {
                        label.set_inner_text(LABEL_DONE);
                        let _ = label.style().set_property("background", "#10b981");
                    } else {
                        label.set_inner_text(LABEL_KEPT);
                    }
                }
                Err(e) => {
                    tracing::warn!("カバーレターの生成に失敗: {:?}", e);
                    label.set_inner_text(LABEL_ERROR);
                }
            }
        });
    }) as Box<dyn FnMut(_)>);

    let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();

    if parent.insert_before(&button, Some(textarea)).is_err() {
        tracing::warn!("カバーレターボタンを追加できません");
    }
}
