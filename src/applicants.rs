//! Applicant list and what-if logic shared by the pages and the CLI.
//!
//! Everything here works on in-memory copies fetched from the scoring API:
//! substring search over the loaded list, the summary tiles above the
//! table, and the merge of edited what-if fields over an applicant's
//! feature vector.

use crate::errors::AppError;
use crate::models::{Applicant, FeatureVector, FEATURE_KEYS};
use std::collections::HashMap;

/// A field the what-if form lets the user edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatIfField {
    pub key: &'static str,
    pub label: &'static str,
}

pub const WHAT_IF_FIELDS: [WhatIfField; 4] = [
    WhatIfField {
        key: "LIMIT_BAL",
        label: "Credit Limit",
    },
    WhatIfField {
        key: "AGE",
        label: "Age",
    },
    WhatIfField {
        key: "PAY_0",
        label: "Recent Payment Status (PAY_0)",
    },
    WhatIfField {
        key: "BILL_AMT1",
        label: "Recent Bill (BILL_AMT1)",
    },
];

/// Number of explanation rows shown next to a score.
pub const TOP_CONTRIBUTIONS: usize = 6;

/// Case-insensitive substring search over id, age and credit limit.
///
/// An empty query returns the whole list. Order is preserved.
pub fn filter_applicants<'a>(applicants: &'a [Applicant], query: &str) -> Vec<&'a Applicant> {
    if query.is_empty() {
        return applicants.iter().collect();
    }

    let needle = query.to_lowercase();
    applicants
        .iter()
        .filter(|row| {
            [
                row.id.to_string(),
                row.age.to_string(),
                row.limit_bal.to_string(),
            ]
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Figures shown in the tiles above the applicant table.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantSummary {
    pub count: usize,
    mean_limit: Option<f64>,
    mean_age: Option<f64>,
}

impl ApplicantSummary {
    pub fn from_applicants(applicants: &[&Applicant]) -> Self {
        let count = applicants.len();
        if count == 0 {
            return Self {
                count,
                mean_limit: None,
                mean_age: None,
            };
        }

        let n = count as f64;
        let total_limit: f64 = applicants.iter().map(|a| a.limit_bal).sum();
        let total_age: f64 = applicants.iter().map(|a| a.age as f64).sum();

        Self {
            count,
            mean_limit: Some(total_limit / n),
            mean_age: Some(total_age / n),
        }
    }

    /// `$` amount rounded to whole units, or `--` for an empty list.
    pub fn average_limit(&self) -> String {
        match self.mean_limit {
            Some(mean) => format_amount(mean.round()),
            None => "--".to_string(),
        }
    }

    /// Age with one decimal, or `--` for an empty list.
    pub fn average_age(&self) -> String {
        format_optional(self.mean_age, 1)
    }
}

/// Values of the editable what-if fields, in `WHAT_IF_FIELDS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfEdits {
    values: Vec<(&'static str, f64)>,
}

impl WhatIfEdits {
    /// Seeds every editable field from the applicant's current values.
    pub fn from_applicant(applicant: &Applicant) -> Self {
        let values = WHAT_IF_FIELDS
            .iter()
            .map(|field| (field.key, applicant.feature(field.key).unwrap_or_default()))
            .collect();
        Self { values }
    }

    /// Applies submitted form fields on top of the applicant's values.
    ///
    /// A blank field counts as `0`. Fields the form doesn't carry keep the
    /// applicant's value; keys that aren't editable are ignored.
    pub fn from_form(
        applicant: &Applicant,
        form: &HashMap<String, String>,
    ) -> Result<Self, AppError> {
        let mut edits = Self::from_applicant(applicant);
        for (key, value) in edits.values.iter_mut() {
            let Some(raw) = form.get(*key) else {
                continue;
            };
            *value = parse_number(*key, raw)?;
        }
        Ok(edits)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("{} must be a number, got '{}'", key, raw)))
}

/// Overlays `overrides` onto `base`. Keys missing from `overrides` keep
/// their base value.
pub fn merge_features<I>(base: &FeatureVector, overrides: I) -> FeatureVector
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut merged = base.clone();
    merged.extend(overrides);
    merged
}

/// Payload for `POST /score`: the applicant's features with the edits applied.
pub fn merge_what_if(base: &FeatureVector, edits: &WhatIfEdits) -> FeatureVector {
    merge_features(base, edits.iter().map(|(key, value)| (key.to_string(), value)))
}

/// Parses a `FEATURE=value` override. The feature must be one of the
/// model's input features.
pub fn parse_override(arg: &str) -> Result<(String, f64), AppError> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| AppError::BadRequest(format!("expected FEATURE=value, got '{}'", arg)))?;
    let key = key.trim().to_ascii_uppercase();
    if !FEATURE_KEYS.contains(&key.as_str()) {
        return Err(AppError::BadRequest(format!("unknown feature '{}'", key)));
    }
    let value = parse_number(&key, raw)?;
    Ok((key, value))
}

// ============ Display formatting ============

/// Groups the integer part with commas and keeps up to three decimals,
/// e.g. `1234567.5` -> `1,234,567.5`.
pub fn format_thousands(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();

    let digits = (abs.trunc() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = format!("{:.3}", abs.fract());
    let fraction = fraction.trim_start_matches('0').trim_end_matches('0');
    if fraction.len() > 1 {
        grouped.push_str(fraction);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_amount(value: f64) -> String {
    format!("${}", format_thousands(value))
}

/// Rate in [0, 1] as a percentage with one decimal (`0.253` -> `25.3%`).
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "--".to_string(),
    }
}

/// AUC with two decimals; zero or missing shows as `--`.
pub fn format_auc(auc: Option<f64>) -> String {
    format_optional(auc.filter(|v| *v != 0.0), 2)
}

/// Signed contribution with three decimals (`+0.120`, `-0.045`).
pub fn format_contribution(contribution: f64) -> String {
    if contribution >= 0.0 {
        format!("+{:.3}", contribution.abs())
    } else {
        format!("{:.3}", contribution)
    }
}
