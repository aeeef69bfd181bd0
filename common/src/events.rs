//! 値の書き込みとイベント発火
//!
//! プログラムから値を書いた後は必ず [`notify_changed`] を通す。ホストページの
//! フレームワーク（React等）は input/change イベントでしか変更に気付かない。

use crate::dom::{DomEvent, Page};

/// 書き込んだ欄の背景色
pub const HIGHLIGHT_BACKGROUND: &str = "#e0e7ff";
/// 書き込んだ欄の枠
pub const HIGHLIGHT_SHADOW: &str = "0 0 0 2px #4f46e5 inset";

/// input/change を発火し、書き込んだことが分かるよう装飾する
pub fn notify_changed<P: Page>(page: &P, element: &P::Element) {
    page.dispatch(element, DomEvent::Input);
    page.dispatch(element, DomEvent::Change);
    page.set_style(element, "background-color", HIGHLIGHT_BACKGROUND);
    page.set_style(element, "box-shadow", HIGHLIGHT_SHADOW);
}

/// 未入力かどうか
///
/// すべての書き込みの前にこの判定を通すことで、既に値のある欄を上書きしない。
/// プルダウンは value が空か "0"（プレースホルダーの慣例）なら未選択とみなす。
pub fn is_empty<P: Page>(page: &P, element: &P::Element) -> bool {
    let value = page.value(element);
    if page.tag_name(element) == "select" {
        return value.is_empty() || value == "0";
    }
    value.is_empty()
}

/// 入力可能な要素を返す
///
/// Workday の `data-automation-id` のように入れ物の要素が見つかった場合は、
/// その中の input/textarea を対象にする。
pub fn fillable_target<P: Page>(page: &P, element: &P::Element) -> Option<P::Element> {
    match page.tag_name(element).as_str() {
        "input" | "textarea" => Some(element.clone()),
        _ => page.query_within(element, "input, textarea"),
    }
}

/// 空欄にだけ値を書き込む。書き込んだら true
pub fn write_if_empty<P: Page>(page: &P, element: &P::Element, value: &str) -> bool {
    if value.is_empty() || !is_empty(page, element) {
        return false;
    }

    page.set_value(element, value);
    notify_changed(page, element);
    tracing::debug!("入力: {} 文字", value.chars().count());
    true
}
