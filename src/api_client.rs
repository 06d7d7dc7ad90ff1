use crate::errors::AppError;
use crate::fallbacks;
use crate::models::{
    Applicant, FairnessReport, FeatureVector, HealthStatus, ModelMetrics, MonitoringSummary,
    ScoreResponse,
};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

/// Method and optional JSON body of a single API request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    json_body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            json_body: None,
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            json_body: None,
        }
    }

    /// POST with a JSON body and `Content-Type: application/json`.
    pub fn post_json(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            json_body: Some(body),
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Client for the CreditLens scoring API.
///
/// Every call collapses transport failures, non-2xx statuses, and
/// undecodable bodies into `None`. Callers decide whether to substitute
/// fallback data or surface the absence to the user.
#[derive(Clone)]
pub struct ScoringApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScoringApiClient {
    /// Creates a new `ScoringApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the scoring API, e.g. `http://localhost:8000`.
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("creditlens-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create scoring API client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, path: &str, options: RequestOptions) -> Option<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", options.method, url);

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .header(CACHE_CONTROL, "no-store");
        if let Some(body) = options.json_body {
            request = request.header(CONTENT_TYPE, "application/json").json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Scoring API request {} {} failed: {}", options.method, path, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Scoring API {} {} returned {}",
                options.method,
                path,
                response.status()
            );
            return None;
        }

        Some(response)
    }

    /// Fetches and decodes a JSON resource, or `None` if it is unavailable.
    pub async fn api_fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Option<T> {
        let response = self.send(path, options).await?;
        match response.json::<T>().await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Failed to parse scoring API response for {}: {}", path, e);
                None
            }
        }
    }

    /// Fetches a plain-text resource, or `None` if it is unavailable.
    pub async fn fetch_text(&self, path: &str) -> Option<String> {
        let response = self.send(path, RequestOptions::get()).await?;
        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to read scoring API response for {}: {}", path, e);
                None
            }
        }
    }

    /// Model metrics, falling back to the bundled snapshot when unavailable.
    pub async fn get_model_metrics(&self) -> ModelMetrics {
        match self
            .api_fetch::<ModelMetrics>("/model/metrics", RequestOptions::get())
            .await
        {
            Some(metrics) => metrics,
            None => {
                tracing::info!("Using fallback model metrics");
                fallbacks::model_metrics()
            }
        }
    }

    pub async fn get_applicants(&self, limit: u32) -> Option<Vec<Applicant>> {
        self.api_fetch(
            &format!("/applicants?limit={}&offset=0", limit),
            RequestOptions::get(),
        )
        .await
    }

    pub async fn get_applicant(&self, id: i64) -> Option<Applicant> {
        self.api_fetch(&format!("/applicants/{}", id), RequestOptions::get())
            .await
    }

    /// Scores a stored applicant.
    pub async fn get_applicant_score(&self, id: i64) -> Option<ScoreResponse> {
        self.api_fetch(&format!("/applicants/{}/score", id), RequestOptions::post())
            .await
    }

    /// Scores an ad-hoc feature vector. The vector is sent as-is.
    pub async fn score_applicant(&self, payload: &FeatureVector) -> Option<ScoreResponse> {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to encode score payload: {}", e);
                return None;
            }
        };
        self.api_fetch("/score", RequestOptions::post_json(body))
            .await
    }

    /// Fairness report, falling back to the bundled snapshot when unavailable.
    pub async fn get_fairness_report(&self) -> FairnessReport {
        match self
            .api_fetch::<FairnessReport>("/fairness/report", RequestOptions::get())
            .await
        {
            Some(report) => report,
            None => {
                tracing::info!("Using fallback fairness report");
                fallbacks::fairness_report()
            }
        }
    }

    pub async fn get_monitoring_summary(&self) -> Option<MonitoringSummary> {
        self.api_fetch("/monitoring/summary", RequestOptions::get())
            .await
    }

    /// Markdown model card served by the API.
    pub async fn get_model_card(&self) -> Option<String> {
        self.fetch_text("/model/card").await
    }

    pub async fn health(&self) -> Option<HealthStatus> {
        self.api_fetch("/healthz", RequestOptions::get()).await
    }
}
