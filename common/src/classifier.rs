//! 入力欄の分類と書き込み
//!
//! 1. ブロック内の欄（職歴・学歴・資格）を n 番目のレコードで埋める
//! 2. 残りのテキスト欄を name/id/placeholder/aria-label のキーワードで分類して埋める
//!
//! 既に値のある欄には触れない。ブロックパスが先に走るので、ブロック内の欄は
//! 汎用パスでは「入力済み」として飛ばされる。

use crate::blocks::BlockKind;
use crate::dom::Page;
use crate::events::{fillable_target, is_empty, write_if_empty};
use crate::profile::Profile;
use crate::rules::{first_field_match, ResolvedFieldRule};

/// テキストとして扱う input の type
const TEXT_INPUT_TYPES: &[&str] = &["text", "email", "tel", "url", "number", "search"];

/// カバーレター欄とみなすキーワード
const COVER_LETTER_KEYWORDS: &[&str] = &["cover", "letter", "message to hiring manager"];

/// 汎用パスの結果
#[derive(Debug, Clone, PartialEq)]
pub struct GenericFill<E> {
    pub filled: usize,
    /// 入力済みで飛ばした欄の数
    pub skipped_prefilled: usize,
    /// AI下書きボタンを付ける textarea
    pub cover_letter_targets: Vec<E>,
}

impl<E> Default for GenericFill<E> {
    fn default() -> Self {
        Self { filled: 0, skipped_prefilled: 0, cover_letter_targets: Vec::new() }
    }
}

/// ブロック内の欄を埋める。書き込んだ数を返す
pub fn fill_blocks<P: Page>(page: &P, profile: &Profile, kind: BlockKind) -> usize {
    let records = kind.record_count(profile);
    if records == 0 {
        return 0;
    }

    let blocks = page.query_all(kind.block_selector());
    let mut filled = 0;

    for (index, block) in blocks.iter().take(records).enumerate() {
        for rule in kind.fields() {
            let value = rule.field.resolve(profile, index);
            if value.is_empty() {
                continue;
            }
            let Some(target) = page
                .query_within(block, rule.selector)
                .and_then(|found| fillable_target(page, &found))
            else {
                continue;
            };
            if write_if_empty(page, &target, &value) {
                filled += 1;
            }
        }
    }

    tracing::debug!("{}: {} 件のブロックに {} 欄", kind.label(), blocks.len().min(records), filled);
    filled
}

/// 照合キー（name → id → placeholder → aria-label の最初の空でない値を小文字化）
pub fn lookup_key<P: Page>(page: &P, element: &P::Element) -> String {
    ["name", "id", "placeholder", "aria-label"]
        .iter()
        .find_map(|attr| page.attribute(element, attr).filter(|v| !v.is_empty()))
        .unwrap_or_default()
        .to_lowercase()
}

/// テキスト入力欄か（textarea と、type がテキスト系の input）
pub fn is_text_field<P: Page>(page: &P, element: &P::Element) -> bool {
    match page.tag_name(element).as_str() {
        "textarea" => true,
        "input" => {
            let kind = page
                .attribute(element, "type")
                .unwrap_or_else(|| "text".to_string())
                .to_lowercase();
            TEXT_INPUT_TYPES.contains(&kind.as_str())
        }
        _ => false,
    }
}

pub fn is_cover_letter_key(key: &str) -> bool {
    COVER_LETTER_KEYWORDS.iter().any(|kw| key.contains(kw))
}

/// 汎用パス：残りのテキスト欄をキーワード表で埋める
pub fn fill_generic<P: Page>(page: &P, rules: &[ResolvedFieldRule]) -> GenericFill<P::Element> {
    let mut result = GenericFill::default();

    for element in page.query_all("input, textarea") {
        if !is_text_field(page, &element) {
            continue;
        }
        let key = lookup_key(page, &element);
        if key.is_empty() {
            continue;
        }

        if page.tag_name(&element) == "textarea" && is_cover_letter_key(&key) {
            result.cover_letter_targets.push(element.clone());
        }

        if !is_empty(page, &element) {
            result.skipped_prefilled += 1;
            continue;
        }

        if let Some(rule) = first_field_match(rules, &key) {
            if write_if_empty(page, &element, &rule.value) {
                result.filled += 1;
            }
        }
    }

    result
}
