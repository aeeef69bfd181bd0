//! 人による確認を促すバナー

use leptos::prelude::*;

const BANNER_STYLE: &str = "position: fixed; bottom: 0; left: 0; width: 100%; box-sizing: border-box; \
    background-color: #312e81; color: white; padding: 12px 24px; font-family: system-ui, -apple-system, sans-serif; \
    font-weight: 600; z-index: 999999; box-shadow: 0 -4px 6px -1px rgba(0, 0, 0, 0.1); \
    display: flex; justify-content: space-between; align-items: center;";

const DISMISS_STYLE: &str = "background: transparent; border: 1px solid white; color: white; \
    padding: 4px 12px; border-radius: 4px; cursor: pointer; margin-left: 20px;";

#[component]
pub fn ReviewBanner(message: String) -> impl IntoView {
    let (visible, set_visible) = signal(true);

    view! {
        <Show when=move || visible.get()>
            <div style=BANNER_STYLE>
                <div style="flex: 1; text-align: left;">
                    <strong style="color: #818cf8;">{message.clone()}</strong>
                    " "
                    <span style="color: #fca5a5;">"Please human-review your data."</span>
                </div>
                <div style="font-size: 0.85em; opacity: 0.8;">
                    "We highlighted the Submit button for you. We will never click it automatically."
                </div>
                <button type="button" style=DISMISS_STYLE on:click=move |_| set_visible.set(false)>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}

pub fn show(message: String) {
    super::mount_overlay(move || view! { <ReviewBanner message=message /> });
}
