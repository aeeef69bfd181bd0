//! バックエンドAPI呼び出し（fetch）
//!
//! AI機能はすべてバックエンド経由。APIキーはコンテンツスクリプトに置かない。

use serde::de::DeserializeOwned;
use serde::Serialize;
use sidekick_common::jobs::{
    AnalyzeJobRequest, GenerateTextRequest, GeneratedText, InterviewPrep, InterviewPrepRequest,
    TextPurpose,
};
use sidekick_common::{Endpoint, JobAnalysis, Profile, TrackingRecord};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone)]
pub struct Backend {
    base_url: String,
    session_id: String,
}

impl Backend {
    pub fn new(base_url: &str, session_id: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            session_id: session_id.to_string(),
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.base_url, &self.session_id)
    }

    /// 求人との相性診断
    pub async fn analyze_job(&self, job_description: &str, profile: &Profile) -> Result<JobAnalysis, JsValue> {
        let request = AnalyzeJobRequest { job_description, profile_data: profile };
        post_json(&self.url(Endpoint::AnalyzeJob), &request).await
    }

    /// 面接の想定質問
    pub async fn interview_prep(&self, job_description: &str) -> Result<InterviewPrep, JsValue> {
        let request = InterviewPrepRequest { job_description };
        post_json(&self.url(Endpoint::InterviewPrep), &request).await
    }

    /// カバーレター・リクルーター宛メッセージの生成
    pub async fn generate_text(
        &self,
        purpose: TextPurpose,
        job_description: &str,
        profile: &Profile,
    ) -> Result<GeneratedText, JsValue> {
        let request = GenerateTextRequest {
            prompt_context: purpose.prompt_context(),
            job_description,
            profile_data: profile,
        };
        post_json(&self.url(Endpoint::GenerateText), &request).await
    }

    /// 応募記録をトラッカーへ送る
    pub async fn sync_tracker(&self, record: &TrackingRecord) -> Result<(), JsValue> {
        post(&self.url(Endpoint::SyncTracker), record).await.map(|_| ())
    }
}

async fn post<B: Serialize>(url: &str, body: &B) -> Result<Response, JsValue> {
    let body = serde_json::to_string(body).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window がありません"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }
    Ok(resp)
}

async fn post_json<B: Serialize, R: DeserializeOwned>(url: &str, body: &B) -> Result<R, JsValue> {
    let resp = post(url, body).await?;
    let json = JsFuture::from(resp.json()?).await?;
    Ok(serde_wasm_bindgen::from_value(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_urls() {
        let backend = Backend::new("http://localhost:8000", "abc");
        assert_eq!(backend.url(Endpoint::InterviewPrep), "http://localhost:8000/api/ai/interview-prep/abc");
        assert_eq!(backend.url(Endpoint::SyncTracker), "http://localhost:8000/api/sync-tracker");
    }

    #[test]
    fn test_generate_text_request_shape() {
        let profile = Profile::default();
        let request = GenerateTextRequest {
            prompt_context: TextPurpose::CoverLetter.prompt_context(),
            job_description: "jd",
            profile_data: &profile,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"prompt_context\":\"Cover Letter\""));
        assert!(json.contains("\"profile_data\":"));
    }
}
