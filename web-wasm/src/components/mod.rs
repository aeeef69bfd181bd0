//! ホストページに重ねて表示するUI

pub mod banner;
pub mod cover_letter;
pub mod vibe_check;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// body 直下に入れ物を作って Leptos のビューを載せる
pub fn mount_overlay<F, N>(f: F)
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Some(container) = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    if body.append_child(&container).is_err() {
        tracing::warn!("オーバーレイを追加できません");
        return;
    }
    leptos::mount::mount_to(container, f).forget();
}
