use crate::api_client::ScoringApiClient;
use crate::applicants::{
    filter_applicants, format_amount, format_auc, format_contribution, format_optional, format_percent,
    format_thousands, merge_what_if, ApplicantSummary, WhatIfEdits, TOP_CONTRIBUTIONS,
    WHAT_IF_FIELDS,
};
use crate::charts::{
    drift_bar_chart, fairness_bar_chart, risk_distribution_chart, DriftDatum, FairnessDatum,
    RiskBucketDatum,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::layout::{heading, page};
use crate::model_card;
use crate::models::{Applicant, FairnessGroupMetrics, MonitoringSummary, RiskLevel, ScoreResponse};
use crate::ui::{
    badge, card, escape_html, input, offline_banner, offline_banner_resubmit, stat_tile, table,
    BadgeVariant,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the CreditLens scoring API.
    pub api: ScoringApiClient,
}

/// Portfolio risk mix shown on the dashboard (percent of applicants).
pub const PORTFOLIO_RISK_MIX: [(&str, f64); 3] = [("Low", 54.0), ("Medium", 31.0), ("High", 15.0)];

/// Recent decisions listed on the dashboard: (id, name, pd, bucket).
pub const RECENT_SCORES: [(&str, &str, f64, &str); 4] = [
    ("CL-2041", "Applicant 2041", 0.18, "Low"),
    ("CL-1993", "Applicant 1993", 0.42, "Medium"),
    ("CL-1762", "Applicant 1762", 0.71, "High"),
    ("CL-2207", "Applicant 2207", 0.27, "Medium"),
];

const WHAT_IF_FORM_ID: &str = "what-if-form";

/// Hidden form field carrying the stored score between what-if runs.
/// `POST /applicants/{id}/score` records a score per call and is only
/// issued when the applicant page is opened.
pub const STORED_SCORE_FIELD: &str = "stored_score";

/// Health check endpoint.
///
/// Reports the console's own status and whether the scoring API answers
/// its liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let api = match state.api.health().await {
        Some(_) => "up",
        None => "unreachable",
    };
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "creditlens-console",
            "version": env!("CARGO_PKG_VERSION"),
            "api": api
        })),
    )
}

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

// ============ Dashboard ============

/// GET /dashboard
///
/// Model performance tiles, confusion matrix, risk mix and recent decisions.
/// Metrics fall back to the bundled snapshot when the API is unavailable.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::info!("GET /dashboard");
    let metrics = state.api.get_model_metrics().await;
    let test = &metrics.test_metrics;

    let tiles = format!(
        r#"<div class="grid">{}{}{}</div>"#,
        stat_tile(
            "ROC-AUC",
            &format!("{:.2}", test.roc_auc),
            Some(&format!("Model: {}", metrics.selected_model)),
        ),
        stat_tile(
            "PR-AUC",
            &format!("{:.2}", test.pr_auc),
            Some(&format!("Default rate: {}", format_percent(test.default_rate))),
        ),
        stat_tile(
            "Brier Score",
            &format!("{:.2}", test.brier_score),
            Some(&format!("Selection rate: {}", format_percent(test.predicted_rate))),
        ),
    );

    let confusion = &test.confusion;
    let confusion_table = table(
        &["", "Predicted repay", "Predicted default"],
        &[
            vec![
                "Actual repay".to_string(),
                format_thousands(confusion.tn as f64),
                format_thousands(confusion.fp as f64),
            ],
            vec![
                "Actual default".to_string(),
                format_thousands(confusion.fn_ as f64),
                format_thousands(confusion.tp as f64),
            ],
        ],
    );

    let risk_data: Vec<RiskBucketDatum> = PORTFOLIO_RISK_MIX
        .iter()
        .map(|(name, value)| RiskBucketDatum {
            name: name.to_string(),
            value: *value,
        })
        .collect();
    let bucket_tiles: String = risk_data
        .iter()
        .map(|b| stat_tile(&b.name, &format!("{}%", b.value), None))
        .collect();
    let risk_body = format!(
        r#"{}<div class="grid">{}</div>"#,
        risk_distribution_chart(&risk_data),
        bucket_tiles
    );

    let recent_rows: Vec<Vec<String>> = RECENT_SCORES
        .iter()
        .map(|(id, name, pd, bucket)| {
            vec![
                format!(
                    r#"<div>{}</div><div class="muted">{}</div>"#,
                    escape_html(name),
                    escape_html(id)
                ),
                format!("{:.2}", pd),
                badge(bucket, BadgeVariant::for_risk(RiskLevel::from_bucket(bucket))),
            ]
        })
        .collect();

    let body = format!(
        r#"<div class="page-header">{}<a class="button" href="/dashboard/metrics.json">Export metrics</a></div>
{}
{}
{}
{}"#,
        heading(
            "Portfolio Overview",
            "Snapshot of model performance and risk distribution."
        ),
        tiles,
        card(
            "Risk Distribution",
            Some("Current portfolio scoring buckets."),
            &risk_body
        ),
        card(
            "Recent Scores",
            Some("Latest decisions for manual review."),
            &table(&["Applicant", "PD", "Bucket"], &recent_rows)
        ),
        card(
            "Confusion Matrix",
            Some("Hold-out predictions at the decision threshold."),
            &confusion_table
        ),
    );

    page("Dashboard", "/dashboard", &body)
}

/// GET /dashboard/metrics.json
///
/// Downloads the metrics shown on the dashboard.
pub async fn export_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state.api.get_model_metrics().await;
    (
        [(
            header::CONTENT_DISPOSITION,
            r#"attachment; filename="model-metrics.json""#,
        )],
        Json(metrics),
    )
}

// ============ Applicants ============

#[derive(Debug, Default, Deserialize)]
pub struct ApplicantListParams {
    #[serde(default)]
    pub q: String,
}

/// Link back to the applicant list with the same search.
fn applicants_href(query: &str) -> String {
    if query.is_empty() {
        return "/applicants".to_string();
    }
    match reqwest::Url::parse_with_params("http://console/applicants", &[("q", query)]) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => "/applicants".to_string(),
    }
}

/// GET /applicants
///
/// Applicant directory with substring search over id, age and limit.
pub async fn applicants(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApplicantListParams>,
) -> Html<String> {
    tracing::info!("GET /applicants - q: {:?}", params.q);
    let header = heading(
        "Applicants",
        "Explore applicants stored in the underwriting workspace.",
    );

    let Some(all) = state
        .api
        .get_applicants(state.config.applicant_list_limit)
        .await
    else {
        let body = format!(
            "{}\n{}",
            header,
            offline_banner(
                "Could not load applicants from the scoring API.",
                &applicants_href(&params.q)
            )
        );
        return page("Applicants", "/applicants", &body);
    };

    let filtered = filter_applicants(&all, &params.q);
    let summary = ApplicantSummary::from_applicants(&filtered);
    tracing::debug!("{} of {} applicants match", filtered.len(), all.len());

    let tiles = format!(
        r#"<div class="grid">{}{}{}</div>"#,
        stat_tile("Applicants", &summary.count.to_string(), None),
        stat_tile("Average Limit", &summary.average_limit(), None),
        stat_tile("Average Age", &summary.average_age(), None),
    );

    let search = format!(
        r#"<form method="get" action="/applicants" class="toolbar">{}<button class="button" type="submit">Search</button><p class="muted">{} applicants loaded</p></form>"#,
        input("q", &params.q, "search", "Search by id, age, limit"),
        filtered.len()
    );

    let rows: Vec<Vec<String>> = filtered.iter().map(|row| applicant_row(row)).collect();
    let directory = format!(
        "{}{}",
        search,
        table(
            &["ID", "Age", "Limit", "Sex", "PAY_0", "BILL_AMT1", ""],
            &rows
        )
    );

    let body = format!(
        "{}\n{}\n{}",
        header,
        tiles,
        card("Applicant Directory", None, &directory)
    );
    page("Applicants", "/applicants", &body)
}

fn applicant_row(row: &Applicant) -> Vec<String> {
    vec![
        format!("<strong>{}</strong>", row.display_id()),
        row.age.to_string(),
        format_amount(row.limit_bal),
        badge(row.sex_label(), BadgeVariant::Outline),
        row.pay_0.to_string(),
        format_amount(row.bill_amt1),
        format!(r#"<a href="/applicants/{}">View</a>"#, row.id),
    ]
}

/// Result of the what-if form for one render of the applicant page.
enum WhatIfOutcome {
    NotRun,
    Scored(ScoreResponse),
    Unavailable,
}

/// GET /applicants/:id
///
/// Stored score with explanations, and the what-if form seeded from the
/// applicant's current values.
pub async fn applicant_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Html<String> {
    tracing::info!("GET /applicants/{}", id);

    let Some(applicant) = state.api.get_applicant(id).await else {
        return applicant_unavailable(id);
    };
    let score = state.api.get_applicant_score(id).await;
    let edits = WhatIfEdits::from_applicant(&applicant);

    render_applicant(&applicant, score.as_ref(), &edits, &WhatIfOutcome::NotRun)
}

/// POST /applicants/:id/what-if
///
/// Merges the edited fields over the applicant's features and re-scores
/// the result without persisting anything.
pub async fn applicant_what_if(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>, AppError> {
    tracing::info!("POST /applicants/{}/what-if", id);

    let Some(applicant) = state.api.get_applicant(id).await else {
        return Ok(applicant_unavailable(id));
    };
    let edits = WhatIfEdits::from_form(&applicant, &form)?;
    let payload = merge_what_if(&applicant.feature_vector(), &edits);

    let score = stored_score_from_form(&form);
    let outcome = match state.api.score_applicant(&payload).await {
        Some(what_if) => {
            tracing::info!(
                "What-if for applicant {}: pd {:.3} ({})",
                id,
                what_if.pd,
                what_if.risk_bucket
            );
            WhatIfOutcome::Scored(what_if)
        }
        None => WhatIfOutcome::Unavailable,
    };

    Ok(render_applicant(&applicant, score.as_ref(), &edits, &outcome))
}

fn stored_score_from_form(form: &HashMap<String, String>) -> Option<ScoreResponse> {
    let raw = form.get(STORED_SCORE_FIELD)?;
    match serde_json::from_str(raw) {
        Ok(score) => Some(score),
        Err(e) => {
            tracing::debug!("Ignoring unreadable stored score field: {}", e);
            None
        }
    }
}

fn stored_score_input(score: Option<&ScoreResponse>) -> String {
    score
        .and_then(|s| serde_json::to_string(s).ok())
        .map(|json| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                STORED_SCORE_FIELD,
                escape_html(&json)
            )
        })
        .unwrap_or_default()
}

fn applicant_unavailable(id: i64) -> Html<String> {
    let body = format!(
        "{}\n{}",
        heading("Applicant", "Applicant profile could not be loaded."),
        offline_banner(
            &format!("Applicant CL-{} is unavailable.", id),
            &format!("/applicants/{}", id)
        )
    );
    page("Applicant", "/applicants", &body)
}

fn render_applicant(
    applicant: &Applicant,
    score: Option<&ScoreResponse>,
    edits: &WhatIfEdits,
    outcome: &WhatIfOutcome,
) -> Html<String> {
    let pd = score
        .map(|s| format!("{:.2}", s.pd))
        .unwrap_or_else(|| "--".to_string());
    let bucket = match score {
        Some(s) => badge(&s.risk_bucket, BadgeVariant::for_risk(s.risk_level())),
        None => badge("Unknown", BadgeVariant::Default),
    };
    let model = score
        .map(|s| escape_html(&s.model_name))
        .unwrap_or_else(|| "Not available".to_string());
    let threshold = format_optional(score.and_then(|s| s.threshold), 2);

    let contributions: String = score
        .map(|s| s.top_contributions(TOP_CONTRIBUTIONS))
        .unwrap_or_default()
        .iter()
        .map(|item| {
            let class = if item.contribution >= 0.0 {
                "contribution-up"
            } else {
                "contribution-down"
            };
            format!(
                r#"<div class="tile"><p class="tile-label">{}</p><p>{}</p><span class="{}">{}</span></div>"#,
                escape_html(&item.feature),
                item.value,
                class,
                format_contribution(item.contribution)
            )
        })
        .collect();

    let score_body = format!(
        r#"<div class="grid">
  <div><p class="tile-label">PD</p><p class="tile-value">{}</p></div>
  <div><p class="tile-label">Bucket</p>{}</div>
  <div><p class="tile-label">Model</p><p>{}</p></div>
  <div><p class="tile-label">Threshold</p><p>{}</p></div>
</div>
<div class="grid">{}</div>"#,
        pd, bucket, model, threshold, contributions
    );

    let fields: String = WHAT_IF_FIELDS
        .iter()
        .map(|field| {
            let value = edits.get(field.key).unwrap_or_default();
            format!(
                r#"<div><label for="{}">{}</label>{}</div>"#,
                field.key,
                escape_html(field.label),
                input(field.key, &value.to_string(), "number", "")
            )
        })
        .collect();

    let result = match outcome {
        WhatIfOutcome::NotRun => String::new(),
        WhatIfOutcome::Scored(what_if) => format!(
            r#"<div class="what-if-result"><p class="tile-label">What-if PD</p><p class="tile-value">{:.2}</p>{}</div>"#,
            what_if.pd,
            badge(
                &what_if.risk_bucket,
                BadgeVariant::for_risk(what_if.risk_level())
            )
        ),
        WhatIfOutcome::Unavailable => offline_banner_resubmit(
            "The what-if scenario could not be scored.",
            WHAT_IF_FORM_ID,
            "Retry",
        ),
    };

    let what_if_body = format!(
        r#"<form id="{form_id}" method="post" action="/applicants/{id}/what-if" class="grid">{stored}{fields}</form>
<button class="button" type="submit" form="{form_id}">Run What-if</button>
{result}"#,
        form_id = WHAT_IF_FORM_ID,
        id = applicant.id,
        stored = stored_score_input(score),
        fields = fields,
        result = result
    );

    let body = format!(
        "{}\n{}\n{}",
        heading(
            &format!("Applicant {}", applicant.display_id()),
            "Review score, explanations, and simulate changes."
        ),
        card(
            "Score Summary",
            Some("Current model decision context."),
            &score_body
        ),
        card(
            "What-if Simulation",
            Some("Adjust key inputs and re-score."),
            &what_if_body
        ),
    );

    page(
        &format!("Applicant {}", applicant.display_id()),
        "/applicants",
        &body,
    )
}

// ============ Fairness ============

fn fairness_row(group: &FairnessGroupMetrics) -> Vec<String> {
    vec![
        format!("<strong>{}</strong>", escape_html(&group.group)),
        group.count.to_string(),
        format_percent(group.selection_rate),
        format_percent(group.tpr),
        format_percent(group.fpr),
        format_auc(group.auc),
    ]
}

/// GET /fairness
///
/// Overall and per-group diagnostics. Falls back to the bundled report
/// when the API is unavailable.
pub async fn fairness(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::info!("GET /fairness");
    let report = state.api.get_fairness_report().await;
    let overall = &report.overall;

    let overall_tiles = format!(
        r#"<div class="grid">{}{}{}{}</div>"#,
        stat_tile("Selection Rate", &format_percent(overall.selection_rate), None),
        stat_tile("TPR", &format_percent(overall.tpr), None),
        stat_tile("FPR", &format_percent(overall.fpr), None),
        stat_tile("AUC", &format_auc(overall.auc), None),
    );

    let slices: String = report
        .slices
        .iter()
        .map(|slice| {
            let rows: Vec<Vec<String>> = slice.groups.iter().map(fairness_row).collect();
            let chart_data: Vec<FairnessDatum> = slice
                .groups
                .iter()
                .map(|group| FairnessDatum {
                    group: group.group.clone(),
                    tpr: round1(group.tpr * 100.0),
                    fpr: round1(group.fpr * 100.0),
                })
                .collect();
            let body = format!(
                "{}{}",
                table(
                    &["Group", "Count", "Selection Rate", "TPR", "FPR", "AUC"],
                    &rows
                ),
                fairness_bar_chart(&chart_data)
            );
            card(
                &slice.feature,
                Some("Group-level selection and error rates."),
                &body,
            )
        })
        .collect();

    let body = format!(
        "{}\n{}\n{}",
        heading("Fairness Diagnostics", &report.notes),
        card(
            "Overall Metrics",
            Some(&format!(
                "Aggregate performance at the selected threshold ({:.2}).",
                report.threshold
            )),
            &overall_tiles
        ),
        slices
    );
    page("Fairness", "/fairness", &body)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============ Monitoring ============

/// GET /monitoring
///
/// Drift of each feature against the training baseline.
pub async fn monitoring(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::info!("GET /monitoring");
    let body = match state.api.get_monitoring_summary().await {
        Some(summary) => monitoring_report(&summary),
        None => format!(
            "{}\n{}\n{}",
            heading(
                "Monitoring",
                "Drift summaries will appear here once baseline stats are generated."
            ),
            offline_banner("Monitoring summary is unavailable.", "/monitoring"),
            card(
                "Monitoring Setup",
                None,
                r#"<p class="muted">Run the training pipeline to capture baseline feature statistics.</p>"#
            )
        ),
    };
    page("Monitoring", "/monitoring", &body)
}

fn monitoring_report(summary: &MonitoringSummary) -> String {
    let drifting = summary
        .features
        .iter()
        .filter(|f| f.drift_level != crate::models::DriftLevel::Low)
        .count();

    let tiles = format!(
        r#"<div class="grid">{}{}{}</div>"#,
        stat_tile("Applicants Monitored", &format_thousands(summary.count as f64), None),
        stat_tile(
            "Features Drifting",
            &format!("{} / {}", drifting, summary.features.len()),
            None
        ),
        stat_tile("Generated", &summary.generated_at, None),
    );

    let chart_data: Vec<DriftDatum> = summary
        .features
        .iter()
        .map(|f| DriftDatum {
            feature: f.feature.clone(),
            psi: f.psi,
        })
        .collect();

    let rows: Vec<Vec<String>> = summary
        .features
        .iter()
        .map(|f| {
            vec![
                format!("<strong>{}</strong>", escape_html(&f.feature)),
                format!("{:.2}", f.baseline_mean),
                format!("{:.2}", f.current_mean),
                format!("{:+.2}", f.mean_shift),
                format!("{:.3}", f.psi),
                badge(f.drift_level.as_str(), BadgeVariant::for_drift(f.drift_level)),
            ]
        })
        .collect();

    format!(
        "{}\n{}\n{}\n{}",
        heading(
            "Monitoring",
            "Population stability of each feature against the training baseline."
        ),
        tiles,
        card(
            "Feature Drift",
            Some("PSI above 0.1 is moderate, above 0.2 is high."),
            &drift_bar_chart(&chart_data)
        ),
        card(
            "Drift Summary",
            None,
            &table(
                &[
                    "Feature",
                    "Baseline Mean",
                    "Current Mean",
                    "Mean Shift",
                    "PSI",
                    "Drift"
                ],
                &rows
            )
        )
    )
}

// ============ Model card ============

/// GET /model-card
pub async fn model_card(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::info!("GET /model-card");
    let markdown = model_card::load(&state.config.model_card_path, &state.api).await;

    let body = format!(
        "{}\n{}",
        heading(
            "Model Card",
            "Documentation on data, training, performance, and limitations."
        ),
        card(
            "CreditLens Model Card",
            None,
            &format!(
                r#"<div class="markdown">{}</div>"#,
                model_card::render_markdown(&markdown)
            )
        )
    );
    page("Model Card", "/model-card", &body)
}
