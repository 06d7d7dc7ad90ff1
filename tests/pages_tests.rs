/// Page rendering tests through the full router
/// The scoring API is either a wiremock server or an unreachable address
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use creditlens_console::api::handlers::AppState;
use creditlens_console::api::routes::build_router;
use creditlens_console::config::Config;
use creditlens_console::fallbacks::FAIRNESS_NOTES;
use creditlens_console::integrations::scoring_api::ScoringApiClient;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn create_test_config(api_base_url: String) -> Config {
    Config {
        api_base_url,
        port: 3000,
        model_card_path: "/nonexistent/model-card.md".to_string(),
        applicant_list_limit: 200,
        max_request_size: 1_000_000,
    }
}

fn app(api_base_url: &str) -> Router {
    let config = create_test_config(api_base_url.to_string());
    let api = ScoringApiClient::new(config.api_base_url.clone()).unwrap();
    build_router(Arc::new(AppState { config, api }))
}

fn applicant_json(id: i64, age: i64, limit: f64) -> serde_json::Value {
    json!({
        "id": id, "LIMIT_BAL": limit, "SEX": 1, "EDUCATION": 2, "MARRIAGE": 1,
        "AGE": age, "PAY_0": 2, "PAY_2": 2, "PAY_3": -1, "PAY_4": -1, "PAY_5": -2,
        "PAY_6": -2, "BILL_AMT1": 3913.0, "BILL_AMT2": 3102.0, "BILL_AMT3": 689.0,
        "BILL_AMT4": 0.0, "BILL_AMT5": 0.0, "BILL_AMT6": 0.0, "PAY_AMT1": 0.0,
        "PAY_AMT2": 689.0, "PAY_AMT3": 0.0, "PAY_AMT4": 0.0, "PAY_AMT5": 0.0,
        "PAY_AMT6": 0.0, "created_at": "2024-05-01T10:00:00"
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_form(app: Router, uri: &str, form: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let response = app(UNREACHABLE_API)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn test_health_reports_unreachable_api() {
    let (status, body) = get(app(UNREACHABLE_API), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["api"], "unreachable");
}

#[tokio::test]
async fn test_dashboard_uses_fallback_metrics_when_offline() {
    let (status, body) = get(app(UNREACHABLE_API), "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Portfolio Overview"));
    assert!(body.contains("ROC-AUC"));
    assert!(body.contains("Model: logistic_regression"));
    assert!(body.contains("CL-1762"));
    assert!(body.contains("<svg"));
}

#[tokio::test]
async fn test_export_metrics_is_a_json_attachment() {
    let response = app(UNREACHABLE_API)
        .oneshot(
            Request::builder()
                .uri("/dashboard/metrics.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("model-metrics.json"));

    let (_, body) = read(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["selected_model"], "logistic_regression");
}

#[tokio::test]
async fn test_applicants_offline_banner_keeps_query() {
    let (status, body) = get(app(UNREACHABLE_API), "/applicants?q=30").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("API offline."));
    assert!(body.contains(r#"href="/applicants?q=30""#));
}

#[tokio::test]
async fn test_applicants_search_filters_rows() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            applicant_json(1, 30, 20000.0),
            applicant_json(2, 45, 120000.0),
            applicant_json(3, 52, 30000.0)
        ])))
        .mount(&mock_server)
        .await;

    let (_, body) = get(app(&mock_server.uri()), "/applicants?q=30").await;
    assert!(body.contains("2 applicants loaded"));
    assert!(body.contains(r#"href="/applicants/1""#));
    assert!(body.contains(r#"href="/applicants/3""#));
    assert!(!body.contains(r#"href="/applicants/2""#));
    assert!(body.contains("$25,000"));

    let (_, body) = get(app(&mock_server.uri()), "/applicants?q=99").await;
    assert!(body.contains("0 applicants loaded"));
    assert!(body.contains("--"));
}

#[tokio::test]
async fn test_applicant_detail_without_score() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/applicants/1/score"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (status, body) = get(app(&mock_server.uri()), "/applicants/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Applicant CL-1"));
    assert!(body.contains("Unknown"));
    assert!(body.contains("Not available"));
    assert!(body.contains(r#"name="LIMIT_BAL" value="20000""#));
    assert!(body.contains("Run What-if"));
}

#[tokio::test]
async fn test_applicant_detail_unavailable() {
    let (status, body) = get(app(UNREACHABLE_API), "/applicants/42").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Applicant CL-42 is unavailable."));
    assert!(body.contains(r#"href="/applicants/42""#));
}

#[tokio::test]
async fn test_non_numeric_applicant_id_is_rejected() {
    let (status, _) = get(app(UNREACHABLE_API), "/applicants/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn encode_form(pairs: &[(&str, &str)]) -> String {
    reqwest::Url::parse_with_params("http://console/", pairs)
        .unwrap()
        .query()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_applicant_detail_embeds_stored_score_in_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/applicants/1/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pd": 0.71, "risk_bucket": "High", "model_name": "logistic_regression"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(app(&mock_server.uri()), "/applicants/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"type="hidden" name="stored_score""#));
    assert!(body.contains("&quot;pd&quot;:0.71"));
}

#[tokio::test]
async fn test_what_if_scores_merged_features_without_recording_scores() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;
    // The stored-score endpoint persists a score on every call
    Mock::given(method("POST"))
        .and(path("/applicants/1/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pd": 0.71, "risk_bucket": "High", "model_name": "logistic_regression"
        })))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(body_partial_json(json!({
            "LIMIT_BAL": 80000.0, "AGE": 30.0, "PAY_0": 0.0, "BILL_AMT1": 3913.0, "PAY_2": 2.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pd": 0.18, "risk_bucket": "Low", "threshold": 0.32, "model_name": "logistic_regression"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let stored = json!({
        "pd": 0.71, "risk_bucket": "High", "model_name": "logistic_regression",
        "explanations": [{"feature": "PAY_0", "value": 2.0, "contribution": 0.412}]
    })
    .to_string();
    let form = encode_form(&[
        ("stored_score", stored.as_str()),
        ("LIMIT_BAL", "80000"),
        ("AGE", "30"),
        ("PAY_0", "0"),
        ("BILL_AMT1", "3913"),
    ]);

    for _ in 0..3 {
        let (status, body) =
            post_form(app(&mock_server.uri()), "/applicants/1/what-if", &form).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("What-if PD"));
        assert!(body.contains("0.18"));
        assert!(body.contains(r#"name="LIMIT_BAL" value="80000""#));
        // Stored score card survives the round trip
        assert!(body.contains("0.71"));
        assert!(body.contains("+0.412"));
        assert!(body.contains(r#"name="stored_score""#));
    }

    let recorded = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/applicants/1/score")
        .count();
    assert_eq!(recorded, 0);
}

#[tokio::test]
async fn test_what_if_with_unreadable_stored_score_shows_unknown() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pd": 0.18, "risk_bucket": "Low", "model_name": "logistic_regression"
        })))
        .mount(&mock_server)
        .await;

    let form = encode_form(&[("stored_score", "{not json"), ("LIMIT_BAL", "80000")]);
    let (status, body) = post_form(app(&mock_server.uri()), "/applicants/1/what-if", &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Unknown"));
    assert!(body.contains("Not available"));
    assert!(body.contains("What-if PD"));
}

#[tokio::test]
async fn test_what_if_offline_keeps_edits_and_offers_retry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;
    // Neither score endpoint is mounted

    let (status, body) = post_form(
        app(&mock_server.uri()),
        "/applicants/1/what-if",
        "LIMIT_BAL=65000&AGE=41&PAY_0=1&BILL_AMT1=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("API offline."));
    assert!(body.contains(r#"form="what-if-form""#));
    assert!(body.contains(r#"name="AGE" value="41""#));
    assert!(body.contains(r#"name="BILL_AMT1" value="0""#));
}

#[tokio::test]
async fn test_what_if_rejects_non_numeric_input() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applicants/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json(1, 30, 20000.0)))
        .mount(&mock_server)
        .await;

    let (status, body) = post_form(
        app(&mock_server.uri()),
        "/applicants/1/what-if",
        "LIMIT_BAL=lots&AGE=30",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("LIMIT_BAL must be a number"));
}

#[tokio::test]
async fn test_fairness_falls_back_when_offline() {
    let (status, body) = get(app(UNREACHABLE_API), "/fairness").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fairness Diagnostics"));
    assert!(body.contains(FAIRNESS_NOTES));
    assert!(body.contains("Overall Metrics"));
    assert!(body.contains("Group-level selection and error rates."));
}

#[tokio::test]
async fn test_fairness_missing_or_zero_auc_shows_dashes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fairness/report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generated_at": "2024-05-02T08:00:00",
            "threshold": 0.4,
            "notes": "Computed on the hold-out split.",
            "overall": {"group": "overall", "count": 6000, "default_rate": 0.22,
                        "selection_rate": 0.2, "tpr": 0.6, "fpr": 0.1, "auc": 0.0},
            "slices": [{"feature": "EDUCATION", "groups": [
                {"group": "4", "count": 25, "default_rate": 0.0, "selection_rate": 0.0,
                 "tpr": 0.0, "fpr": 0.0, "auc": null}
            ]}]
        })))
        .mount(&mock_server)
        .await;

    let (_, body) = get(app(&mock_server.uri()), "/fairness").await;
    assert!(body.contains("Computed on the hold-out split."));
    assert!(body.contains("EDUCATION"));
    assert!(body.contains("<td>--</td>"));
    assert!(body.contains(r#"<p class="tile-label">AUC</p><p class="tile-value">--</p>"#));
}

#[tokio::test]
async fn test_monitoring_setup_when_absent() {
    let (status, body) = get(app(UNREACHABLE_API), "/monitoring").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Drift summaries will appear here once baseline stats are generated."));
    assert!(body.contains("Monitoring Setup"));
    assert!(body.contains(r#"href="/monitoring""#));
}

#[tokio::test]
async fn test_monitoring_renders_drift() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/monitoring/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generated_at": "2024-05-02T08:00:00",
            "count": 1200,
            "features": [
                {"feature": "PAY_0", "baseline_mean": -0.02, "current_mean": 0.31,
                 "mean_shift": 0.33, "psi": 0.24, "drift_level": "high"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let (_, body) = get(app(&mock_server.uri()), "/monitoring").await;
    assert!(body.contains("1,200"));
    assert!(body.contains("1 / 1"));
    assert!(body.contains(r#"<span class="badge badge-danger">high</span>"#));
    assert!(!body.contains("Monitoring Setup"));
}

#[tokio::test]
async fn test_model_card_renders_markdown_and_escapes_html() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model/card"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("# CreditLens\n\n<script>x</script>"),
        )
        .mount(&mock_server)
        .await;

    let (status, body) = get(app(&mock_server.uri()), "/model-card").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("CreditLens Model Card"));
    assert!(body.contains("<h1>CreditLens</h1>"));
    assert!(body.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!body.contains("<script>x</script>"));
}
