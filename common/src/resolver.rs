//! プルダウンの選択
//!
//! はい/いいえ の質問はルール表で、EEO・学歴など自由な選択肢はプロフィールの
//! 文言と選択肢テキストの照合で選ぶ。選択済みのプルダウンには触れない。

use crate::dom::{Page, SelectOption};
use crate::events::{is_empty, notify_changed};
use crate::profile::{Answer, Profile};
use crate::rules::{first_boolean_match, ComplianceCategory, ResolvedBooleanRule};

/// プルダウンの文脈（name/id/aria-label と対応する label の文言、小文字）
pub fn select_context<P: Page>(page: &P, select: &P::Element) -> String {
    let own = ["name", "id", "aria-label"]
        .iter()
        .find_map(|attr| page.attribute(select, attr).filter(|v| !v.is_empty()))
        .unwrap_or_default();
    let label = page
        .attribute(select, "id")
        .filter(|id| !id.is_empty())
        .and_then(|id| page.label_for(&id))
        .unwrap_or_default();
    format!("{} {}", own, label).trim().to_lowercase()
}

/// 回答に対応する選択肢の位置
pub fn answer_option(options: &[SelectOption], answer: Answer) -> Option<usize> {
    let words: &[&str] = match answer {
        Answer::Yes => &["yes", "true"],
        Answer::No => &["no", "false"],
        Answer::Unset => return None,
    };
    options.iter().position(|opt| {
        let text = opt.text.to_lowercase();
        words.iter().any(|w| text.contains(w))
    })
}

/// 希望の文言に合う選択肢の位置（完全一致を優先し、なければ部分一致）
pub fn matching_option(options: &[SelectOption], desired: &str) -> Option<usize> {
    let desired = desired.trim().to_lowercase();
    if desired.is_empty() {
        return None;
    }

    let texts: Vec<String> = options.iter().map(|o| o.text.trim().to_lowercase()).collect();
    texts
        .iter()
        .position(|t| *t == desired)
        .or_else(|| {
            texts
                .iter()
                .position(|t| !t.is_empty() && (t.contains(&desired) || desired.contains(t.as_str())))
        })
}

fn choose<P: Page>(page: &P, select: &P::Element, index: usize) -> bool {
    if !is_empty(page, select) {
        return false;
    }
    page.select_index(select, index);
    notify_changed(page, select);
    true
}

/// 未選択のプルダウンを埋める。選択した数を返す
pub fn resolve_selects<P: Page>(page: &P, profile: &Profile, rules: &[ResolvedBooleanRule]) -> usize {
    let mut chosen = 0;

    for select in page.query_all("select") {
        if !is_empty(page, &select) {
            continue;
        }
        let context = select_context(page, &select);
        let options = page.options(&select);

        // はい/いいえ ルールに一致したらそこで終わり（EEO照合には進まない）
        if let Some(rule) = first_boolean_match(rules, &context) {
            if let Some(index) = answer_option(&options, rule.answer) {
                if choose(page, &select, index) {
                    chosen += 1;
                }
            }
            continue;
        }

        let Some(category) = ComplianceCategory::detect(&context) else {
            continue;
        };
        if let Some(index) = matching_option(&options, category.resolve(profile)) {
            if choose(page, &select, index) {
                chosen += 1;
            }
        }
    }

    chosen
}
