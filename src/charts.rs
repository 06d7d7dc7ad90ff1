//! Inline SVG chart wrappers.
//!
//! The charts only lay out numbers they are given; every aggregate comes
//! from the scoring API.

use crate::ui::escape_html;
use std::f64::consts::PI;

const RISK_COLORS: [&str; 3] = ["#0f766e", "#f59e0b", "#e11d48"];
const TPR_COLOR: &str = "#0f766e";
const FPR_COLOR: &str = "#f59e0b";
const PSI_COLOR: &str = "#0f766e";
const GRID_COLOR: &str = "#e2e8f0";

#[derive(Debug, Clone, PartialEq)]
pub struct RiskBucketDatum {
    pub name: String,
    pub value: f64,
}

/// TPR and FPR of one group, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct FairnessDatum {
    pub group: String,
    pub tpr: f64,
    pub fpr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriftDatum {
    pub feature: String,
    pub psi: f64,
}

// ============ Donut ============

const PIE_SIZE: f64 = 220.0;
const INNER_RADIUS: f64 = 50.0;
const OUTER_RADIUS: f64 = 80.0;

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    let center = PIE_SIZE / 2.0;
    (center + radius * angle.cos(), center + radius * angle.sin())
}

/// Full ring, drawn as a thick stroked circle.
fn ring(color: &str, title: &str) -> String {
    let center = PIE_SIZE / 2.0;
    let width = OUTER_RADIUS - INNER_RADIUS;
    let radius = INNER_RADIUS + width / 2.0;
    format!(
        r#"<circle cx="{c:.2}" cy="{c:.2}" r="{r:.2}" fill="none" stroke="{color}" stroke-width="{w:.2}"><title>{title}</title></circle>"#,
        c = center,
        r = radius,
        w = width
    )
}

fn annular_sector(start: f64, end: f64, color: &str, title: &str) -> String {
    let large_arc = if end - start > PI { 1 } else { 0 };
    let (ox0, oy0) = polar(OUTER_RADIUS, start);
    let (ox1, oy1) = polar(OUTER_RADIUS, end);
    let (ix1, iy1) = polar(INNER_RADIUS, end);
    let (ix0, iy0) = polar(INNER_RADIUS, start);
    format!(
        r#"<path d="M {ox0:.2} {oy0:.2} A {ro} {ro} 0 {la} 1 {ox1:.2} {oy1:.2} L {ix1:.2} {iy1:.2} A {ri} {ri} 0 {la} 0 {ix0:.2} {iy0:.2} Z" fill="{color}"><title>{title}</title></path>"#,
        ro = OUTER_RADIUS,
        ri = INNER_RADIUS,
        la = large_arc,
    )
}

/// Donut chart of the portfolio's risk buckets.
pub fn risk_distribution_chart(data: &[RiskBucketDatum]) -> String {
    let total: f64 = data.iter().map(|d| d.value.max(0.0)).sum();

    let mut shapes = String::new();
    if total <= 0.0 {
        shapes.push_str(&ring(GRID_COLOR, "No data"));
    } else {
        let mut angle = -PI / 2.0;
        for (index, datum) in data.iter().enumerate() {
            let value = datum.value.max(0.0);
            if value == 0.0 {
                continue;
            }
            let color = RISK_COLORS[index % RISK_COLORS.len()];
            let title = escape_html(&format!("{}: {}", datum.name, datum.value));
            if value >= total {
                // A full circle can't be drawn as a single arc.
                shapes.push_str(&ring(color, &title));
                break;
            }
            let sweep = value / total * 2.0 * PI;
            shapes.push_str(&annular_sector(angle, angle + sweep, color, &title));
            angle += sweep;
        }
    }

    format!(
        r#"<svg class="chart chart-pie" viewBox="0 0 {size} {size}" width="{size}" height="{size}" role="img" aria-label="Risk distribution">{shapes}</svg>"#,
        size = PIE_SIZE,
        shapes = shapes
    )
}

// ============ Bars ============

const BAR_WIDTH: f64 = 480.0;
const BAR_HEIGHT: f64 = 256.0;
const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 10.0;
const PAD_TOP: f64 = 10.0;
const PAD_BOTTOM: f64 = 30.0;

struct Series<'a> {
    name: &'a str,
    color: &'a str,
    values: Vec<f64>,
}

fn bar_chart(label: &str, categories: &[String], series: &[Series<'_>]) -> String {
    let plot_width = BAR_WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = BAR_HEIGHT - PAD_TOP - PAD_BOTTOM;
    let baseline = PAD_TOP + plot_height;

    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut body = String::new();

    for step in 0..=4 {
        let y = PAD_TOP + plot_height * step as f64 / 4.0;
        body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-dasharray="3 3"/>"#,
            PAD_LEFT,
            y,
            BAR_WIDTH - PAD_RIGHT,
            y,
            GRID_COLOR
        ));
    }
    body.push_str(&format!(
        r#"<text class="axis" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
        PAD_LEFT - 6.0,
        PAD_TOP + 4.0,
        format_tick(max)
    ));
    body.push_str(&format!(
        r#"<text class="axis" x="{:.2}" y="{:.2}" text-anchor="end">0</text>"#,
        PAD_LEFT - 6.0,
        baseline
    ));

    if !categories.is_empty() && !series.is_empty() {
        let band = plot_width / categories.len() as f64;
        let bar = band * 0.7 / series.len() as f64;

        for (ci, category) in categories.iter().enumerate() {
            let band_start = PAD_LEFT + band * ci as f64 + band * 0.15;
            for (si, s) in series.iter().enumerate() {
                let value = s.values.get(ci).copied().unwrap_or(0.0);
                let height = if max > 0.0 && value.is_finite() {
                    (value.max(0.0) / max) * plot_height
                } else {
                    0.0
                };
                body.push_str(&format!(
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="6" fill="{}"><title>{}</title></rect>"#,
                    band_start + bar * si as f64,
                    baseline - height,
                    bar,
                    height,
                    s.color,
                    escape_html(&format!("{} {}: {}", category, s.name, value))
                ));
            }
            body.push_str(&format!(
                r#"<text class="axis" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                PAD_LEFT + band * ci as f64 + band / 2.0,
                BAR_HEIGHT - 10.0,
                escape_html(category)
            ));
        }
    }

    format!(
        r#"<svg class="chart chart-bar" viewBox="0 0 {w} {h}" width="100%" height="{h}" role="img" aria-label="{label}">{body}</svg>"#,
        w = BAR_WIDTH,
        h = BAR_HEIGHT,
        label = escape_html(label),
        body = body
    )
}

fn format_tick(value: f64) -> String {
    if value >= 10.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Grouped TPR/FPR bars per population group.
pub fn fairness_bar_chart(data: &[FairnessDatum]) -> String {
    let categories: Vec<String> = data.iter().map(|d| d.group.clone()).collect();
    let series = [
        Series {
            name: "tpr",
            color: TPR_COLOR,
            values: data.iter().map(|d| d.tpr).collect(),
        },
        Series {
            name: "fpr",
            color: FPR_COLOR,
            values: data.iter().map(|d| d.fpr).collect(),
        },
    ];
    bar_chart("Fairness by group", &categories, &series)
}

/// PSI per feature.
pub fn drift_bar_chart(data: &[DriftDatum]) -> String {
    let categories: Vec<String> = data.iter().map(|d| d.feature.clone()).collect();
    let series = [Series {
        name: "psi",
        color: PSI_COLOR,
        values: data.iter().map(|d| d.psi).collect(),
    }];
    bar_chart("Feature drift", &categories, &series)
}
