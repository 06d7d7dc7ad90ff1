use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature name -> numeric value, as accepted by `POST /score`.
pub type FeatureVector = BTreeMap<String, f64>;

/// The 23 model input features, in the order the scoring API documents them.
pub const FEATURE_KEYS: [&str; 23] = [
    "LIMIT_BAL",
    "SEX",
    "EDUCATION",
    "MARRIAGE",
    "AGE",
    "PAY_0",
    "PAY_2",
    "PAY_3",
    "PAY_4",
    "PAY_5",
    "PAY_6",
    "BILL_AMT1",
    "BILL_AMT2",
    "BILL_AMT3",
    "BILL_AMT4",
    "BILL_AMT5",
    "BILL_AMT6",
    "PAY_AMT1",
    "PAY_AMT2",
    "PAY_AMT3",
    "PAY_AMT4",
    "PAY_AMT5",
    "PAY_AMT6",
];

// ============ Applicants ============

/// A stored credit applicant as returned by `GET /applicants`.
///
/// Owned and persisted by the scoring API; the console only holds
/// read-only copies for the duration of a page render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    /// Applicant identifier.
    pub id: i64,
    /// Credit limit.
    #[serde(rename = "LIMIT_BAL")]
    pub limit_bal: f64,
    /// 1 = male, 2 = female.
    #[serde(rename = "SEX")]
    pub sex: i64,
    #[serde(rename = "EDUCATION")]
    pub education: i64,
    #[serde(rename = "MARRIAGE")]
    pub marriage: i64,
    #[serde(rename = "AGE")]
    pub age: i64,
    /// Repayment status for the most recent month.
    #[serde(rename = "PAY_0")]
    pub pay_0: i64,
    #[serde(rename = "PAY_2")]
    pub pay_2: i64,
    #[serde(rename = "PAY_3")]
    pub pay_3: i64,
    #[serde(rename = "PAY_4")]
    pub pay_4: i64,
    #[serde(rename = "PAY_5")]
    pub pay_5: i64,
    #[serde(rename = "PAY_6")]
    pub pay_6: i64,
    #[serde(rename = "BILL_AMT1")]
    pub bill_amt1: f64,
    #[serde(rename = "BILL_AMT2")]
    pub bill_amt2: f64,
    #[serde(rename = "BILL_AMT3")]
    pub bill_amt3: f64,
    #[serde(rename = "BILL_AMT4")]
    pub bill_amt4: f64,
    #[serde(rename = "BILL_AMT5")]
    pub bill_amt5: f64,
    #[serde(rename = "BILL_AMT6")]
    pub bill_amt6: f64,
    #[serde(rename = "PAY_AMT1")]
    pub pay_amt1: f64,
    #[serde(rename = "PAY_AMT2")]
    pub pay_amt2: f64,
    #[serde(rename = "PAY_AMT3")]
    pub pay_amt3: f64,
    #[serde(rename = "PAY_AMT4")]
    pub pay_amt4: f64,
    #[serde(rename = "PAY_AMT5")]
    pub pay_amt5: f64,
    #[serde(rename = "PAY_AMT6")]
    pub pay_amt6: f64,
    /// Creation timestamp, displayed as received.
    pub created_at: String,
}

impl Applicant {
    /// Display identifier used across the console (`CL-42`).
    pub fn display_id(&self) -> String {
        format!("CL-{}", self.id)
    }

    pub fn sex_label(&self) -> &'static str {
        if self.sex == 1 {
            "M"
        } else {
            "F"
        }
    }

    /// Looks up a single model feature by its API name.
    pub fn feature(&self, key: &str) -> Option<f64> {
        let value = match key {
            "LIMIT_BAL" => self.limit_bal,
            "SEX" => self.sex as f64,
            "EDUCATION" => self.education as f64,
            "MARRIAGE" => self.marriage as f64,
            "AGE" => self.age as f64,
            "PAY_0" => self.pay_0 as f64,
            "PAY_2" => self.pay_2 as f64,
            "PAY_3" => self.pay_3 as f64,
            "PAY_4" => self.pay_4 as f64,
            "PAY_5" => self.pay_5 as f64,
            "PAY_6" => self.pay_6 as f64,
            "BILL_AMT1" => self.bill_amt1,
            "BILL_AMT2" => self.bill_amt2,
            "BILL_AMT3" => self.bill_amt3,
            "BILL_AMT4" => self.bill_amt4,
            "BILL_AMT5" => self.bill_amt5,
            "BILL_AMT6" => self.bill_amt6,
            "PAY_AMT1" => self.pay_amt1,
            "PAY_AMT2" => self.pay_amt2,
            "PAY_AMT3" => self.pay_amt3,
            "PAY_AMT4" => self.pay_amt4,
            "PAY_AMT5" => self.pay_amt5,
            "PAY_AMT6" => self.pay_amt6,
            _ => return None,
        };
        Some(value)
    }

    /// All model features of this applicant, without `id` and `created_at`.
    pub fn feature_vector(&self) -> FeatureVector {
        FEATURE_KEYS
            .iter()
            .filter_map(|key| self.feature(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

// ============ Scoring ============

/// Signed contribution of a single feature to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub value: f64,
    pub contribution: f64,
}

/// Response of both scoring endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Probability of default in [0, 1].
    pub pd: f64,
    pub risk_bucket: String,
    /// Decision threshold. Scores of stored applicants omit it.
    #[serde(default)]
    pub threshold: Option<f64>,
    pub model_name: String,
    #[serde(default)]
    pub explanations: Option<Vec<FeatureContribution>>,
}

impl ScoreResponse {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_bucket(&self.risk_bucket)
    }

    /// First `n` explanations in the order the API ranked them.
    pub fn top_contributions(&self, n: usize) -> &[FeatureContribution] {
        match &self.explanations {
            Some(items) => &items[..items.len().min(n)],
            None => &[],
        }
    }
}

/// Risk bucket label as understood by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn from_bucket(bucket: &str) -> Self {
        match bucket.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }
}

// ============ Model Metrics ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
    pub tp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetrics {
    pub roc_auc: f64,
    pub pr_auc: f64,
    pub brier_score: f64,
    pub confusion: ConfusionMatrix,
    pub default_rate: f64,
    pub predicted_rate: f64,
}

/// Hold-out metrics of the selected model (`GET /model/metrics`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub selected_model: String,
    pub test_metrics: TestMetrics,
}

// ============ Fairness ============

/// Selection and error rates for one population group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessGroupMetrics {
    pub group: String,
    pub count: u64,
    pub default_rate: f64,
    pub selection_rate: f64,
    /// True positive rate.
    pub tpr: f64,
    /// False positive rate.
    pub fpr: f64,
    /// Undefined for groups with a single outcome class.
    #[serde(default)]
    pub auc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessSlice {
    pub feature: String,
    pub groups: Vec<FairnessGroupMetrics>,
}

/// Fairness diagnostics (`GET /fairness/report`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub generated_at: String,
    pub threshold: f64,
    pub notes: String,
    pub overall: FairnessGroupMetrics,
    pub slices: Vec<FairnessSlice>,
}

// ============ Monitoring ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftLevel {
    Low,
    Moderate,
    High,
}

impl DriftLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftLevel::Low => "low",
            DriftLevel::Moderate => "moderate",
            DriftLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringFeatureSummary {
    pub feature: String,
    pub baseline_mean: f64,
    pub current_mean: f64,
    /// Shift of the mean in baseline standard deviations.
    pub mean_shift: f64,
    pub psi: f64,
    pub drift_level: DriftLevel,
}

/// Drift summary against the training baseline (`GET /monitoring/summary`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSummary {
    pub generated_at: String,
    pub count: u64,
    pub features: Vec<MonitoringFeatureSummary>,
}

/// Upstream liveness probe (`GET /healthz`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
