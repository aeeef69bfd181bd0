//! バックエンドAPIクライアント
//!
//! 相性診断・面接対策・文章生成・応募記録の4エンドポイントだけを扱う。
//! 失敗しても再送はしない。

use crate::config::Config;
use crate::error::{Result, SidekickError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sidekick_common::jobs::{
    AnalyzeJobRequest, GenerateTextRequest, GeneratedText, InterviewPrep, InterviewPrepRequest,
};
use sidekick_common::{Endpoint, JobAnalysis, Profile, TrackingRecord};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// エラー表示に含めるレスポンス本文の上限
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl BackendClient {
    pub fn new(base_url: &str, session_id: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sidekick/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SidekickError::ApiCall(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            session_id: session_id.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.backend_url(), &config.session_id())
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.base_url, &self.session_id)
    }

    pub async fn analyze_job(&self, job_description: &str, profile: &Profile) -> Result<JobAnalysis> {
        let body = AnalyzeJobRequest {
            job_description,
            profile_data: profile,
        };
        self.post_json(Endpoint::AnalyzeJob, &body).await
    }

    pub async fn interview_prep(&self, job_description: &str) -> Result<InterviewPrep> {
        let body = InterviewPrepRequest { job_description };
        self.post_json(Endpoint::InterviewPrep, &body).await
    }

    /// `prompt_context` は "Cover Letter" / "Recruiter DM" など
    pub async fn generate_text(
        &self,
        prompt_context: &str,
        job_description: &str,
        profile: &Profile,
    ) -> Result<GeneratedText> {
        let body = GenerateTextRequest {
            prompt_context,
            job_description,
            profile_data: profile,
        };
        self.post_json(Endpoint::GenerateText, &body).await
    }

    /// 応募記録を送る（レスポンス本文は読まない）
    pub async fn sync_tracker(&self, record: &TrackingRecord) -> Result<()> {
        self.post(Endpoint::SyncTracker, record).await?;
        Ok(())
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!("POST {}", url);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SidekickError::ApiCall(format!("{}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(SidekickError::ApiCall(format!("{} ({}): {}", url, status, snippet)));
        }
        Ok(resp)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: Endpoint, body: &B) -> Result<T> {
        let resp = self.post(endpoint, body).await?;
        let text = resp
            .text()
            .await
            .map_err(|e| SidekickError::ApiCall(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| SidekickError::ApiParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls_include_session() {
        let client = BackendClient::new("http://localhost:8000/", "abc").unwrap();
        assert_eq!(
            client.endpoint_url(Endpoint::AnalyzeJob),
            "http://localhost:8000/api/ai/analyze-job/abc"
        );
        assert_eq!(
            client.endpoint_url(Endpoint::SyncTracker),
            "http://localhost:8000/api/sync-tracker"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_api_call_error() {
        // 予約済みポート0には接続できない
        let client = BackendClient::new("http://127.0.0.1:0", "demo-session").unwrap();
        let err = client.interview_prep("Rust engineer").await.unwrap_err();
        assert!(matches!(err, SidekickError::ApiCall(_)));
    }
}
