//! コンテンツスクリプトの本体
//!
//! プロフィール読み込み → 自動入力 → バナー表示 → 送信ボタン監視 → カバーレター
//! ボタン → 相性診断 の順に1回だけ動く。

use crate::api::Backend;
use crate::components::{banner, cover_letter, vibe_check};
use crate::page::{WebClock, WebPage};
use crate::storage;
use crate::tracker;
use sidekick_common::{scrape_job_description, EngineConfig, FillPass, FillReport};
use web_sys::Element;

pub async fn run() {
    let Some(page) = WebPage::new() else {
        return;
    };
    let config = EngineConfig::default();

    let profile = match storage::load_profile().await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("プロフィールを読めません: {:?}", e);
            None
        }
    };
    let session_id = storage::load_session_id().await;
    let backend = Backend::new(&config.backend_url, &session_id);

    let notify = |report: &FillReport<Element>| banner::show(report.banner_message());
    let mut pass = FillPass::new(&page, &WebClock, &config);
    let Some(report) = pass.run(profile.as_ref(), &notify).await.report() else {
        return;
    };
    let Some(profile) = profile else {
        return;
    };

    tracker::observe_submits(&page, &report.flagged_submits, &backend);

    for textarea in &report.cover_letter_targets {
        cover_letter::attach(
            &page,
            textarea,
            backend.clone(),
            profile.clone(),
            config.max_job_description_chars,
        );
    }

    let Some(job_description) = scrape_job_description(
        &page,
        config.max_job_description_chars,
        config.min_job_description_chars,
    ) else {
        return;
    };

    match backend.analyze_job(&job_description, &profile).await {
        Ok(analysis) => vibe_check::show(analysis, backend, profile, job_description),
        Err(e) => tracing::warn!("Sidekick Vibe Check failed: {:?}", e),
    }
}
