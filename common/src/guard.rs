//! 送信ボタンの検出と強調（ハードストップ）
//!
//! エンジンは送信系のボタンを見つけて目立たせるだけで、押さない。
//! このモジュールには要素を押す処理も、フォームを送信する処理も存在しない。

use crate::dom::Page;

/// 送信を意図するボタンの文言
pub const SUBMIT_KEYWORDS: &[&str] = &["submit", "apply", "complete"];

const SUBMIT_CONTROLS: &str = r#"button, input[type="submit"]"#;

const GLOW: &str = "0 0 15px 4px #10b981";
const BORDER: &str = "2px solid #10b981";

/// 強調したボタン
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedControl<E> {
    pub element: E,
    /// 小文字化した表示文言
    pub label: String,
}

/// ボタンの表示文言（テキスト → value → aria-label の順）
pub fn control_label<P: Page>(page: &P, element: &P::Element) -> String {
    let text = page.text_content(element);
    if !text.is_empty() {
        return text.to_lowercase();
    }
    let value = page.value(element);
    if !value.is_empty() {
        return value.to_lowercase();
    }
    page.attribute(element, "aria-label")
        .unwrap_or_default()
        .to_lowercase()
}

/// 文言が送信を意図しているか
pub fn is_submit_intent<P: Page>(page: &P, element: &P::Element) -> bool {
    let label = control_label(page, element);
    SUBMIT_KEYWORDS.iter().any(|kw| label.contains(kw))
}

/// 押すとフォームが送信されうるか
///
/// type=submit/image、フォーム内の type 未指定（または不明な type）の button、
/// 送信を意図する文言のいずれかなら真。フォーム内で押せるのは type=button/reset だけ。
pub fn may_submit<P: Page>(page: &P, element: &P::Element) -> bool {
    let kind = page
        .attribute(element, "type")
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if matches!(kind.as_str(), "submit" | "image") {
        return true;
    }
    // button の既定の type は submit
    if page.tag_name(element) == "button"
        && !matches!(kind.as_str(), "button" | "reset")
        && page.in_form(element)
    {
        return true;
    }
    is_submit_intent(page, element)
}

/// 送信ボタンを探して強調する
pub fn flag_submit_controls<P: Page>(page: &P) -> Vec<FlaggedControl<P::Element>> {
    page.query_all(SUBMIT_CONTROLS)
        .into_iter()
        .filter_map(|element| {
            let label = control_label(page, &element);
            if !SUBMIT_KEYWORDS.iter().any(|kw| label.contains(kw)) {
                return None;
            }

            page.set_style(&element, "box-shadow", GLOW);
            page.set_style(&element, "border", BORDER);
            tracing::warn!(
                "[HARD STOP] 送信ボタン「{}」を検出。自動では押しません。内容を確認してください",
                label
            );
            Some(FlaggedControl { element, label })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryPage;

    const PAGE: &str = r#"
        <form>
          <button type="button">Add Another</button>
          <button>Submit Application</button>
          <input type="submit" value="Complete">
          <input type="button" value="Apply later">
          <a class="btn">Apply now</a>
        </form>
    "#;

    #[test]
    fn test_flags_only_submit_controls() {
        let page = MemoryPage::from_html(PAGE);
        let flagged = flag_submit_controls(&page);
        let labels: Vec<&str> = flagged.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["submit application", "complete"]);
    }

    #[test]
    fn test_flagging_never_presses() {
        let page = MemoryPage::from_html(PAGE);
        let flagged = flag_submit_controls(&page);
        for control in &flagged {
            assert_eq!(page.press_count(control.element), 0);
            assert!(page.events(control.element).is_empty());
            assert_eq!(page.style(control.element, "border").as_deref(), Some(BORDER));
        }
    }

    #[test]
    fn test_may_submit() {
        let page = MemoryPage::from_html(
            r#"<button type="submit">Add</button><button type="button">Add</button><button>Apply</button>"#,
        );
        let buttons = page.query_all("button");
        assert!(may_submit(&page, &buttons[0]));
        assert!(!may_submit(&page, &buttons[1]));
        assert!(may_submit(&page, &buttons[2]));
    }

    #[test]
    fn test_typeless_button_in_form_may_submit() {
        let page = MemoryPage::from_html(
            r#"<form>
                 <button>Add</button>
                 <button type="BUTTON">Add</button>
                 <button type="reset">Add</button>
                 <button type="bogus">Add</button>
               </form>
               <button>Add</button>"#,
        );
        let buttons = page.query_all("button");
        assert!(may_submit(&page, &buttons[0]));
        assert!(!may_submit(&page, &buttons[1]));
        assert!(!may_submit(&page, &buttons[2]));
        assert!(may_submit(&page, &buttons[3]));
        // フォーム外の type 未指定ボタンは送信しない
        assert!(!may_submit(&page, &buttons[4]));
    }
}
