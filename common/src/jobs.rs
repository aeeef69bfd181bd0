//! 求人情報まわり（ジョブ記述の抽出・AIバックエンドの型・応募記録）
//!
//! バックエンドへの送信そのものはCLI（reqwest）とコンテンツスクリプト（fetch）が
//! それぞれ行う。ここにはリクエスト／レスポンスの形と、ページから値を拾う処理を置く。

use crate::dom::Page;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};

/// ジョブ記述を含むコンテナ
pub const JOB_DESCRIPTION_CONTAINERS: &str =
    r#".job-description, .posting-requirements, [data-automation="jobDescription"]"#;

/// 会社名を拾う見出し
pub const COMPANY_HEADERS: &str = r#"h1, h2, .company-name, [data-automation-id="companyName"]"#;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_ROLE: &str = "Applied Role";

/// 文字数（バイト数ではない）で切り詰める
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// ページからジョブ記述を抜き出す
///
/// 既知のコンテナがあればその本文を連結し、なければページ本文全体を使う。
/// `min_chars` に満たなければ解析に値しないとして None。
pub fn scrape_job_description<P: Page>(page: &P, max_chars: usize, min_chars: usize) -> Option<String> {
    let containers = page.query_all(JOB_DESCRIPTION_CONTAINERS);
    let text = if containers.is_empty() {
        page.body_text()
    } else {
        containers
            .iter()
            .map(|c| page.text_content(c))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let text = truncate_chars(text.trim(), max_chars);
    if text.chars().count() < min_chars {
        tracing::debug!("ジョブ記述が短すぎます（{} 文字）", text.chars().count());
        return None;
    }
    Some(text.to_string())
}

/// バックエンドのエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AnalyzeJob,
    InterviewPrep,
    GenerateText,
    SyncTracker,
}

impl Endpoint {
    /// パス（AI系はセッションIDを含む）
    pub fn path(&self, session_id: &str) -> String {
        match self {
            Endpoint::AnalyzeJob => format!("/api/ai/analyze-job/{}", session_id),
            Endpoint::InterviewPrep => format!("/api/ai/interview-prep/{}", session_id),
            Endpoint::GenerateText => format!("/api/ai/generate-text/{}", session_id),
            Endpoint::SyncTracker => "/api/sync-tracker".to_string(),
        }
    }

    pub fn url(&self, base_url: &str, session_id: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path(session_id))
    }
}

/// 求人との相性診断リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeJobRequest<'a> {
    pub job_description: &'a str,
    pub profile_data: &'a Profile,
}

/// 面接対策リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct InterviewPrepRequest<'a> {
    pub job_description: &'a str,
}

/// 文章生成リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct GenerateTextRequest<'a> {
    pub prompt_context: &'a str,
    pub job_description: &'a str,
    pub profile_data: &'a Profile,
}

/// 生成する文章の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPurpose {
    CoverLetter,
    RecruiterDm,
}

impl TextPurpose {
    /// バックエンドに渡す prompt_context
    pub fn prompt_context(&self) -> &'static str {
        match self {
            TextPurpose::CoverLetter => "Cover Letter",
            TextPurpose::RecruiterDm => "Recruiter DM",
        }
    }
}

/// 相性診断の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAnalysis {
    pub match_score: f64,
    pub missing_keywords: Vec<String>,
    pub red_flags: Vec<String>,
}

/// スコアの評価帯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "#34d399",
            ScoreBand::Fair => "#fbbf24",
            ScoreBand::Weak => "#f87171",
        }
    }
}

impl JobAnalysis {
    pub fn band(&self) -> ScoreBand {
        if self.match_score > 75.0 {
            ScoreBand::Strong
        } else if self.match_score > 50.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// 面接の想定質問
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepQuestion {
    pub question: String,
    pub answer_guide: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewPrep {
    pub questions: Vec<PrepQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedText {
    pub text: String,
}

/// 応募記録（利用者が送信ボタンを押したときだけ送る）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub company: String,
    pub title: String,
    pub url: String,
    /// YYYY-MM-DD
    pub date: String,
}

impl TrackingRecord {
    /// ページから会社名・職種名を推定する
    pub fn from_page<P: Page>(page: &P, date: impl Into<String>) -> Self {
        let company = page
            .query(COMPANY_HEADERS)
            .map(|header| page.text_content(&header))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

        let title = page.title();
        let title = title.split('-').next().unwrap_or_default().trim();
        let title = if title.is_empty() { UNKNOWN_ROLE } else { title };

        Self {
            company,
            title: title.to_string(),
            url: page.url(),
            date: date.into(),
        }
    }
}
