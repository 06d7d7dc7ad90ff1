//! Presentational HTML fragments used by every page.
//!
//! All text passed in is escaped here; callers hand over raw values.

use crate::models::{DriftLevel, RiskLevel};

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    #[default]
    Default,
    Success,
    Warning,
    Danger,
    Outline,
}

impl BadgeVariant {
    pub fn as_class(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "badge badge-default",
            BadgeVariant::Success => "badge badge-success",
            BadgeVariant::Warning => "badge badge-warning",
            BadgeVariant::Danger => "badge badge-danger",
            BadgeVariant::Outline => "badge badge-outline",
        }
    }

    pub fn for_risk(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => BadgeVariant::Success,
            RiskLevel::Medium => BadgeVariant::Warning,
            RiskLevel::High => BadgeVariant::Danger,
            RiskLevel::Unknown => BadgeVariant::Default,
        }
    }

    pub fn for_drift(level: DriftLevel) -> Self {
        match level {
            DriftLevel::Low => BadgeVariant::Success,
            DriftLevel::Moderate => BadgeVariant::Warning,
            DriftLevel::High => BadgeVariant::Danger,
        }
    }
}

pub fn badge(label: &str, variant: BadgeVariant) -> String {
    format!(
        r#"<span class="{}">{}</span>"#,
        variant.as_class(),
        escape_html(label)
    )
}

pub fn input(name: &str, value: &str, kind: &str, placeholder: &str) -> String {
    format!(
        r#"<input class="input" type="{}" id="{}" name="{}" value="{}" placeholder="{}">"#,
        escape_html(kind),
        escape_html(name),
        escape_html(name),
        escape_html(value),
        escape_html(placeholder)
    )
}

/// A titled card. `body` is already-rendered HTML.
pub fn card(title: &str, description: Option<&str>, body: &str) -> String {
    let description = description
        .map(|d| format!(r#"<p class="card-description">{}</p>"#, escape_html(d)))
        .unwrap_or_default();
    format!(
        r#"<section class="card">
  <header class="card-header"><h2 class="card-title">{}</h2>{}</header>
  <div class="card-content">{}</div>
</section>"#,
        escape_html(title),
        description,
        body
    )
}

/// A small metric tile: caption, big value, optional note underneath.
pub fn stat_tile(label: &str, value: &str, note: Option<&str>) -> String {
    let note = note
        .map(|n| format!(r#"<p class="tile-note">{}</p>"#, escape_html(n)))
        .unwrap_or_default();
    format!(
        r#"<div class="tile"><p class="tile-label">{}</p><p class="tile-value">{}</p>{}</div>"#,
        escape_html(label),
        escape_html(value),
        note
    )
}

/// A table. Header labels are escaped; cells are already-rendered HTML.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|c| format!("<td>{}</td>", c)).collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        r#"<table class="table"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
        head, body
    )
}

/// Banner shown when the scoring API didn't answer, with a retry link.
pub fn offline_banner(message: &str, retry_href: &str) -> String {
    format!(
        r#"<div class="banner banner-offline" role="alert"><strong>API offline.</strong> {} <a class="button" href="{}">Retry</a></div>"#,
        escape_html(message),
        escape_html(retry_href)
    )
}

/// Banner for a failed form submission; the retry button re-submits `form_id`.
pub fn offline_banner_resubmit(message: &str, form_id: &str, retry_label: &str) -> String {
    format!(
        r#"<div class="banner banner-offline" role="alert"><strong>API offline.</strong> {} <button class="button" type="submit" form="{}">{}</button></div>"#,
        escape_html(message),
        escape_html(form_id),
        escape_html(retry_label)
    )
}
