//! 保存フォームでのプレビューテスト
//!
//! tests/fixtures の応募フォームとプロフィールで入力処理を最後まで走らせる。

use sidekick_common::{MemoryPage, TrackingRecord};
use sidekick_rust::error::SidekickError;
use sidekick_rust::preview::{preview_file, PreviewReport};
use sidekick_rust::profile_store::load_profile;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

async fn run_fixture() -> PreviewReport {
    let profile = load_profile(&fixture("profile.json")).unwrap();
    preview_file(&fixture("apply_form.html"), &profile, true).await.unwrap()
}

fn value_of<'a>(report: &'a PreviewReport, element: &str) -> Option<&'a str> {
    report
        .filled
        .iter()
        .find(|f| f.element == element)
        .map(|f| f.value.as_str())
}

/// 全フェーズの件数
#[tokio::test]
async fn test_fill_counts() {
    let report = run_fixture().await;
    assert_eq!(report.block_fills, 9);
    assert_eq!(report.generic_fills, 4);
    assert_eq!(report.select_fills, 2);
    assert_eq!(report.total, 15);
    assert_eq!(report.skipped_prefilled, 10);
    assert_eq!(report.banner, "Sidekick: Autofilled 15 fields! Review the form, then press the highlighted submit button yourself.");
}

/// 職歴は2件に複製され、学歴は行数上限で1件のまま
#[tokio::test]
async fn test_block_replication() {
    let report = run_fixture().await;
    let experience = report.blocks.iter().find(|b| b.kind == "experience").unwrap();
    assert_eq!((experience.wanted, experience.present), (2, 2));
    let education = report.blocks.iter().find(|b| b.kind == "education").unwrap();
    assert_eq!((education.wanted, education.present), (2, 1));

    let titles: Vec<&str> = report
        .filled
        .iter()
        .filter(|f| f.element == "input[name=job-title]")
        .map(|f| f.value.as_str())
        .collect();
    assert_eq!(titles, vec!["Rear Admiral", "Senior Mathematician"]);

    // 勤務地がなければ居住地で補う
    let locations: Vec<&str> = report
        .filled
        .iter()
        .filter(|f| f.element == "input[name=work-location]")
        .map(|f| f.value.as_str())
        .collect();
    assert_eq!(locations, vec!["Washington", "Arlington"]);
}

/// 入力済みの欄は上書きしない
#[tokio::test]
async fn test_prefilled_email_untouched() {
    let report = run_fixture().await;
    assert_eq!(value_of(&report, "input[name=first_name]"), Some("Grace"));
    assert_eq!(value_of(&report, "input[name=linkedin]"), Some("https://www.linkedin.com/in/grace-hopper"));
    assert_eq!(value_of(&report, "input[name=email]"), None);
}

/// はい/いいえ と EEO のプルダウン
#[tokio::test]
async fn test_select_answers() {
    let report = run_fixture().await;
    assert_eq!(value_of(&report, "select[name=sponsorship]"), Some("2"));
    assert_eq!(value_of(&report, "select[id=gender]"), Some("Female"));
}

/// 送信ボタンは強調されるだけで、下書き保存や追加ボタンは対象外
#[tokio::test]
async fn test_only_submit_is_flagged() {
    let report = run_fixture().await;
    assert_eq!(report.submit_controls.len(), 1);
    assert!(report.submit_controls[0].contains("submit application"));
    assert_eq!(report.cover_letter_targets, vec!["textarea[name=cover_letter]".to_string()]);
}

/// JSON出力の形
#[tokio::test]
async fn test_report_serializes() {
    let report = run_fixture().await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total"], 15);
    assert_eq!(json["filled"][0]["element"], "input[name=first_name]");
}

/// 存在しないフォームはファイルエラー
#[tokio::test]
async fn test_missing_form() {
    let dir = tempdir().unwrap();
    let profile = load_profile(&fixture("profile.json")).unwrap();
    let err = preview_file(&dir.path().join("nope.html"), &profile, true).await.unwrap_err();
    assert!(matches!(err, SidekickError::FileNotFound(_)));
}

/// 応募記録は見出しとタイトルから作る
#[test]
fn test_tracking_record_from_saved_page() {
    let html = std::fs::read_to_string(fixture("apply_form.html")).unwrap();
    let page = MemoryPage::from_html(&html).with_url("https://careers.globex.example/apply/42");
    let record = TrackingRecord::from_page(&page, "2026-10-18");
    assert_eq!(record.company, "Globex Corporation");
    assert_eq!(record.title, "Platform Engineer");
    assert_eq!(record.url, "https://careers.globex.example/apply/42");
}
