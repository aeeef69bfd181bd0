//! 1回分の自動入力
//!
//! 待機 → ブロック複製 → ブロック内入力 → 汎用入力 → プルダウン → 送信ボタン強調 → 通知
//! の順に1度だけ実行する。送信はしない。最後の一押しは常に人間が行う。

use crate::blocks::BlockKind;
use crate::classifier::{fill_blocks, fill_generic};
use crate::config::EngineConfig;
use crate::dom::{Clock, Page};
use crate::guard::{flag_submit_controls, FlaggedControl};
use crate::profile::Profile;
use crate::replicator::ensure_blocks;
use crate::resolver::resolve_selects;
use crate::rules::{resolve_boolean_rules, resolve_field_rules, BooleanRule, FieldRule, BOOLEAN_RULES, FIELD_RULES};

/// 実行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Filling,
    Done,
}

/// ブロック複製の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSummary {
    pub kind: BlockKind,
    /// プロフィール中の件数
    pub wanted: usize,
    /// 複製後のページ上のブロック数
    pub present: usize,
}

/// 入力結果
#[derive(Debug, Clone, PartialEq)]
pub struct FillReport<E> {
    pub blocks: Vec<BlockSummary>,
    pub block_fills: usize,
    pub generic_fills: usize,
    pub select_fills: usize,
    /// 入力済みで飛ばしたテキスト欄
    pub skipped_prefilled: usize,
    pub flagged_submits: Vec<FlaggedControl<E>>,
    pub cover_letter_targets: Vec<E>,
}

impl<E> Default for FillReport<E> {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            block_fills: 0,
            generic_fills: 0,
            select_fills: 0,
            skipped_prefilled: 0,
            flagged_submits: Vec::new(),
            cover_letter_targets: Vec::new(),
        }
    }
}

impl<E> FillReport<E> {
    /// 書き込みに成功した欄の合計
    pub fn total(&self) -> usize {
        self.block_fills + self.generic_fills + self.select_fills
    }

    /// 利用者向けの完了メッセージ
    pub fn banner_message(&self) -> String {
        let mut message = format!("Sidekick: Autofilled {} fields!", self.total());
        if !self.flagged_submits.is_empty() {
            message.push_str(" Review the form, then press the highlighted submit button yourself.");
        }
        message
    }
}

/// 実行結果
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome<E> {
    /// プロフィールがないので何もしなかった
    NoProfile,
    /// 既に実行済み
    AlreadyRan,
    Completed(FillReport<E>),
}

impl<E> FillOutcome<E> {
    pub fn report(self) -> Option<FillReport<E>> {
        match self {
            FillOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// 完了通知の受け手（ブラウザではバナー、CLIでは標準出力）
pub trait Notifier<E> {
    fn notify(&self, report: &FillReport<E>);
}

impl<E, F: Fn(&FillReport<E>)> Notifier<E> for F {
    fn notify(&self, report: &FillReport<E>) {
        self(report)
    }
}

/// 1ページにつき1回だけ走る入力処理
pub struct FillPass<'a, P: Page, C: Clock> {
    page: &'a P,
    clock: &'a C,
    config: &'a EngineConfig,
    field_rules: &'a [FieldRule],
    boolean_rules: &'a [BooleanRule],
    state: PassState,
}

impl<'a, P: Page, C: Clock> FillPass<'a, P, C> {
    pub fn new(page: &'a P, clock: &'a C, config: &'a EngineConfig) -> Self {
        Self {
            page,
            clock,
            config,
            field_rules: FIELD_RULES,
            boolean_rules: BOOLEAN_RULES,
            state: PassState::Idle,
        }
    }

    /// ルール表を差し替える
    pub fn with_rules(mut self, field_rules: &'a [FieldRule], boolean_rules: &'a [BooleanRule]) -> Self {
        self.field_rules = field_rules;
        self.boolean_rules = boolean_rules;
        self
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// 入力処理を実行する
    pub async fn run(
        &mut self,
        profile: Option<&Profile>,
        notifier: &impl Notifier<P::Element>,
    ) -> FillOutcome<P::Element> {
        if self.state != PassState::Idle {
            tracing::debug!("入力処理は実行済みです");
            return FillOutcome::AlreadyRan;
        }

        self.clock.sleep(self.config.initial_settle()).await;

        let Some(profile) = profile else {
            tracing::info!("プロフィールが未保存のため入力しません");
            self.state = PassState::Done;
            return FillOutcome::NoProfile;
        };

        self.state = PassState::Filling;
        let page = self.page;
        let mut report = FillReport::default();

        for kind in BlockKind::ALL {
            let wanted = kind.record_count(profile);
            if wanted == 0 {
                continue;
            }
            let present = ensure_blocks(
                page,
                self.clock,
                kind.block_selector(),
                kind.add_buttons(),
                wanted,
                self.config.block_settle(),
            )
            .await;
            report.blocks.push(BlockSummary { kind, wanted, present });
        }

        for kind in BlockKind::ALL {
            report.block_fills += fill_blocks(page, profile, kind);
        }

        let field_rules = resolve_field_rules(self.field_rules, profile);
        let generic = fill_generic(page, &field_rules);
        report.generic_fills = generic.filled;
        report.skipped_prefilled = generic.skipped_prefilled;
        report.cover_letter_targets = generic.cover_letter_targets;

        let boolean_rules = resolve_boolean_rules(self.boolean_rules, profile);
        report.select_fills = resolve_selects(page, profile, &boolean_rules);

        report.flagged_submits = flag_submit_controls(page);

        tracing::info!(
            "入力完了: ブロック {} / テキスト {} / プルダウン {}（入力済み {} 欄はそのまま）",
            report.block_fills,
            report.generic_fills,
            report.select_fills,
            report.skipped_prefilled
        );

        notifier.notify(&report);
        self.state = PassState::Done;
        FillOutcome::Completed(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryPage, NoDelay, NodeId, PressAction};
    use crate::profile::{Answer, Education, Experience};
    use futures::executor::block_on;
    use std::cell::Cell;

    const FORM: &str = r#"
        <html><head><title>Backend Engineer - Acme</title></head><body>
        <input name="first_name"><input name="last_name"><input name="email" value="keep@example.com">
        <div class="experience-list">
          <div class="job-history"><input name="job_title"><input name="company"></div>
        </div>
        <button type="button" class="add-experience-button">Add another</button>
        <div class="education-component"><input name="school"><input name="degree"></div>
        <label for="auth">Are you legally authorized to work?</label>
        <select id="auth"><option value="">Select</option><option value="y">Yes</option><option value="n">No</option></select>
        <textarea name="cover_letter"></textarea>
        <button type="submit">Submit Application</button>
        </body></html>
    "#;

    fn profile() -> Profile {
        Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            work_auth: Answer::Yes,
            experiences: vec![
                Experience { title: Some("Engineer".into()), company: Some("Acme".into()), ..Default::default() },
                Experience { title: Some("Analyst".into()), company: Some("Babbage & Co".into()), ..Default::default() },
                Experience { title: Some("Writer".into()), company: Some("Notes Ltd".into()), ..Default::default() },
            ],
            educations: vec![Education { institution: Some("University of London".into()), ..Default::default() }],
            ..Default::default()
        }
    }

    fn form() -> (MemoryPage, NodeId) {
        let page = MemoryPage::from_html(FORM);
        let add = page.query(".add-experience-button").unwrap();
        page.on_press(add, PressAction::CloneLast { block_selector: ".job-history".into(), max: None });
        (page, add)
    }

    fn values(page: &MemoryPage) -> Vec<String> {
        page.query_all("input, textarea, select").iter().map(|el| page.value(el)).collect()
    }

    #[test]
    fn test_full_pass() {
        let (page, _) = form();
        let config = EngineConfig::immediate();
        let notified = Cell::new(0);
        let notifier = |report: &FillReport<NodeId>| notified.set(report.total());

        let mut pass = FillPass::new(&page, &NoDelay, &config);
        let report = block_on(pass.run(Some(&profile()), &notifier)).report().unwrap();

        assert_eq!(pass.state(), PassState::Done);
        assert_eq!(page.query_all(".job-history").len(), 3);
        assert_eq!(report.blocks[0], BlockSummary { kind: BlockKind::Experience, wanted: 3, present: 3 });

        // 3件 × (title, company) + 学校
        assert_eq!(report.block_fills, 7);
        // first_name, last_name（email は入力済み）
        assert_eq!(report.generic_fills, 2);
        assert_eq!(report.select_fills, 1);
        assert_eq!(report.total(), 10);
        assert_eq!(notified.get(), 10);

        let email = page.query(r#"input[name="email"]"#).unwrap();
        assert_eq!(page.value(&email), "keep@example.com");

        let titles: Vec<String> = page
            .query_all(r#"input[name="job_title"]"#)
            .iter()
            .map(|el| page.value(el))
            .collect();
        assert_eq!(titles, vec!["Engineer", "Analyst", "Writer"]);

        assert_eq!(report.flagged_submits.len(), 1);
        assert_eq!(report.cover_letter_targets.len(), 1);
    }

    #[test]
    fn test_never_presses_submit() {
        let (page, _) = form();
        let config = EngineConfig::immediate();
        let mut pass = FillPass::new(&page, &NoDelay, &config);
        block_on(pass.run(Some(&profile()), &|_: &FillReport<NodeId>| {}));

        let submit = page.query(r#"button[type="submit"]"#).unwrap();
        assert_eq!(page.press_count(submit), 0);
        assert!(page.events(submit).is_empty());
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let (page, _) = form();
        let config = EngineConfig::immediate();
        let profile = profile();
        let noop = |_: &FillReport<NodeId>| {};

        let mut pass = FillPass::new(&page, &NoDelay, &config);
        block_on(pass.run(Some(&profile), &noop));
        let first = values(&page);

        assert_eq!(block_on(pass.run(Some(&profile), &noop)), FillOutcome::AlreadyRan);

        // 新しい実行でも入力済みの欄は上書きされない
        let mut again = FillPass::new(&page, &NoDelay, &config);
        let report = block_on(again.run(Some(&profile), &noop)).report().unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(values(&page), first);
    }

    #[test]
    fn test_no_profile_does_nothing() {
        let (page, add) = form();
        let config = EngineConfig::immediate();
        let notified = Cell::new(false);
        let notifier = |_: &FillReport<NodeId>| notified.set(true);

        let mut pass = FillPass::new(&page, &NoDelay, &config);
        assert_eq!(block_on(pass.run(None, &notifier)), FillOutcome::NoProfile);
        assert_eq!(pass.state(), PassState::Done);
        assert!(!notified.get());
        assert_eq!(page.press_count(add), 0);
        assert_eq!(values(&page).iter().filter(|v| !v.is_empty()).count(), 1);
    }

    #[test]
    fn test_missing_add_button_fills_existing_block() {
        let page = MemoryPage::from_html(
            r#"<div class="job-history"><input name="job_title"></div>"#,
        );
        let config = EngineConfig::immediate();
        let mut pass = FillPass::new(&page, &NoDelay, &config);
        let report = block_on(pass.run(Some(&profile()), &|_: &FillReport<NodeId>| {}))
            .report()
            .unwrap();

        assert_eq!(report.blocks[0].present, 1);
        assert_eq!(report.block_fills, 1);
        let title = page.query("input").unwrap();
        assert_eq!(page.value(&title), "Engineer");
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[FieldRule] = &[FieldRule {
            keys: &["nickname"],
            exclude: &[],
            field: crate::rules::ProfileField::FirstName,
        }];
        let page = MemoryPage::from_html(r#"<input name="nickname"><input name="first_name">"#);
        let config = EngineConfig::immediate();
        let mut pass = FillPass::new(&page, &NoDelay, &config).with_rules(RULES, &[]);
        let report = block_on(pass.run(Some(&profile()), &|_: &FillReport<NodeId>| {}))
            .report()
            .unwrap();

        assert_eq!(report.generic_fills, 1);
        let inputs = page.query_all("input");
        assert_eq!(page.value(&inputs[0]), "Ada");
        assert_eq!(page.value(&inputs[1]), "");
    }

    #[test]
    fn test_banner_message() {
        let page = MemoryPage::new();
        let mut report: FillReport<NodeId> = FillReport { generic_fills: 4, ..Default::default() };
        assert_eq!(report.banner_message(), "Sidekick: Autofilled 4 fields!");
        report.flagged_submits.push(FlaggedControl { element: page.root(), label: "submit".into() });
        assert!(report.banner_message().contains("submit button yourself"));
    }
}
