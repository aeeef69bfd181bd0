//! 保存したフォームページでの入力プレビュー
//!
//! ATSの応募ページをHTMLとして保存しておけば、ブラウザなしで1回分の入力処理を
//! 走らせて、どの欄に何が入るか・どのボタンが送信ボタンとして強調されるかを確認できる。

use crate::error::{Result, SidekickError};
use serde::Serialize;
use sidekick_common::blocks::BlockKind;
use sidekick_common::dom::{FilledField, NodeId, PressAction};
use sidekick_common::{EngineConfig, FillPass, FillReport, MemoryPage, NoDelay, Page, Profile};
use std::path::Path;

/// ブロック複製の結果（表示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockLine {
    pub kind: String,
    pub wanted: usize,
    pub present: usize,
}

/// プレビュー結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewReport {
    pub total: usize,
    pub block_fills: usize,
    pub generic_fills: usize,
    pub select_fills: usize,
    pub skipped_prefilled: usize,
    pub blocks: Vec<BlockLine>,
    pub filled: Vec<FilledField>,
    pub submit_controls: Vec<String>,
    pub cover_letter_targets: Vec<String>,
    pub banner: String,
}

impl PreviewReport {
    fn from_fill(page: &MemoryPage, report: &FillReport<NodeId>) -> Self {
        Self {
            total: report.total(),
            block_fills: report.block_fills,
            generic_fills: report.generic_fills,
            select_fills: report.select_fills,
            skipped_prefilled: report.skipped_prefilled,
            blocks: report
                .blocks
                .iter()
                .map(|b| BlockLine {
                    kind: b.kind.label().to_string(),
                    wanted: b.wanted,
                    present: b.present,
                })
                .collect(),
            filled: page.filled_fields(),
            submit_controls: report
                .flagged_submits
                .iter()
                .map(|c| format!("{} \"{}\"", page.describe(c.element), c.label))
                .collect(),
            cover_letter_targets: report
                .cover_letter_targets
                .iter()
                .map(|t| page.describe(*t))
                .collect(),
            banner: report.banner_message(),
        }
    }
}

/// 保存ページには「追加」ボタンのスクリプトがないので、既知の追加ボタンに
/// ブロック複製動作を割り当てる（マークアップで指定済みのものは除く）
pub fn simulate_add_buttons(page: &MemoryPage) -> usize {
    let mut wired = 0;
    for kind in BlockKind::ALL {
        for selector in kind.add_buttons() {
            for button in page.query_all(selector) {
                if page.attribute(&button, "data-sidekick-clones").is_some() {
                    continue;
                }
                page.on_press(
                    button,
                    PressAction::CloneLast {
                        block_selector: kind.block_selector().to_string(),
                        max: None,
                    },
                );
                wired += 1;
            }
        }
    }
    wired
}

/// HTML文字列に対して入力処理を1回走らせる
pub async fn preview_html(html: &str, profile: &Profile, simulate_add: bool) -> Result<PreviewReport> {
    let page = MemoryPage::from_html(html);
    if simulate_add {
        let wired = simulate_add_buttons(&page);
        tracing::debug!("追加ボタン{}個に複製動作を割り当て", wired);
    }

    let config = EngineConfig::immediate();
    let mut pass = FillPass::new(&page, &NoDelay, &config);
    let silent = |_: &FillReport<NodeId>| {};
    let report = pass
        .run(Some(profile), &silent)
        .await
        .report()
        .ok_or_else(|| SidekickError::Engine("入力処理が実行されませんでした".into()))?;

    Ok(PreviewReport::from_fill(&page, &report))
}

/// 保存したHTMLファイルに対して入力処理を1回走らせる
pub async fn preview_file(form: &Path, profile: &Profile, simulate_add: bool) -> Result<PreviewReport> {
    if !form.exists() {
        return Err(SidekickError::FileNotFound(form.display().to_string()));
    }
    let html = std::fs::read_to_string(form)?;
    preview_html(&html, profile, simulate_add).await
}

/// 人が読む形式で出力
pub fn print_report(report: &PreviewReport) {
    println!("[1/4] ブロック複製");
    if report.blocks.is_empty() {
        println!("  (なし)");
    }
    for block in &report.blocks {
        let mark = if block.present >= block.wanted { "✔" } else { "⚠" };
        println!(
            "  {} {}: {}件中 {}ブロック",
            mark, block.kind, block.wanted, block.present
        );
    }

    println!("\n[2/4] 入力した欄 ({}件)", report.total);
    for field in &report.filled {
        println!("  ✔ {} = {}", field.element, field.value);
    }
    if report.skipped_prefilled > 0 {
        println!("  ({}件は入力済みのため変更せず)", report.skipped_prefilled);
    }

    println!("\n[3/4] 送信ボタン（強調のみ・押しません）");
    if report.submit_controls.is_empty() {
        println!("  (なし)");
    }
    for control in &report.submit_controls {
        println!("  🛑 {}", control);
    }

    println!("\n[4/4] カバーレター欄");
    if report.cover_letter_targets.is_empty() {
        println!("  (なし)");
    }
    for target in &report.cover_letter_targets {
        println!("  ✎ {}", target);
    }

    println!("\n{}", report.banner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::from_json(
            r#"{
                "firstName": "Ada",
                "email": "ada@example.com",
                "experiences": [{"title": "Engineer"}, {"title": "Analyst"}]
            }"#,
        )
        .unwrap()
    }

    const FORM: &str = r#"
        <form>
          <div class="job-history"><input name="job-title"></div>
          <button type="button" class="add-experience-button">Add Another</button>
          <input name="first_name">
          <input name="email" value="kept@example.com">
          <button type="submit">Submit Application</button>
        </form>
    "#;

    #[tokio::test]
    async fn test_preview_replicates_and_reports() {
        let report = preview_html(FORM, &profile(), true).await.unwrap();
        assert_eq!(report.blocks[0].wanted, 2);
        assert_eq!(report.blocks[0].present, 2);
        assert!(report.filled.iter().any(|f| f.value == "Ada"));
        assert!(report.filled.iter().any(|f| f.value == "Analyst"));
        // ブロック内で入力済みの2欄と元から値のあるemail
        assert_eq!(report.skipped_prefilled, 3);
        assert_eq!(report.submit_controls.len(), 1);
        assert!(report.submit_controls[0].contains("submit application"));
    }

    #[tokio::test]
    async fn test_static_preview_keeps_single_block() {
        let report = preview_html(FORM, &profile(), false).await.unwrap();
        assert_eq!(report.blocks[0].present, 1);
    }
}
