use crate::ui::escape_html;
use axum::response::Html;

/// Sidebar navigation entries: (route, label).
pub const NAV_ITEMS: [(&str, &str); 5] = [
    ("/dashboard", "Dashboard"),
    ("/applicants", "Applicants"),
    ("/fairness", "Fairness"),
    ("/monitoring", "Monitoring"),
    ("/model-card", "Model Card"),
];

const STYLES: &str = r#"
:root { --foreground:#0f172a; --muted:#f1f5f9; --muted-foreground:#64748b; --border:#e2e8f0; --surface:#ffffff; --accent:#0f766e; }
* { box-sizing: border-box; }
body { margin:0; font-family: system-ui, sans-serif; color:var(--foreground); background:#f8fafc; display:flex; min-height:100vh; }
aside.sidebar { width:16rem; border-right:1px solid var(--border); background:var(--surface); display:flex; flex-direction:column; }
.brand { display:flex; gap:.75rem; align-items:center; padding:1.25rem 1.5rem; border-bottom:1px solid var(--border); }
.brand-mark { width:2.5rem; height:2.5rem; border-radius:.75rem; background:var(--accent); color:#fff; display:flex; align-items:center; justify-content:center; font-weight:600; }
nav.nav { flex:1; padding:1.5rem .75rem; }
nav.nav a { display:block; padding:.5rem .75rem; border-radius:.5rem; color:var(--muted-foreground); text-decoration:none; font-size:.875rem; font-weight:500; }
nav.nav a.active, nav.nav a:hover { background:var(--muted); color:var(--foreground); }
.sidebar-footer { border-top:1px solid var(--border); padding:1rem 1.5rem; font-size:.75rem; color:var(--muted-foreground); }
.main { flex:1; display:flex; flex-direction:column; }
header.topnav { display:flex; justify-content:space-between; align-items:center; gap:1rem; padding:1rem 1.5rem; border-bottom:1px solid var(--border); background:var(--surface); }
.content { padding:1.5rem; display:flex; flex-direction:column; gap:1.5rem; }
.muted { color:var(--muted-foreground); font-size:.875rem; }
.card { background:var(--surface); border:1px solid var(--border); border-radius:1rem; }
.card-header { padding:1.25rem 1.5rem .5rem; }
.card-title { margin:0; font-size:1.125rem; }
.card-description { margin:.25rem 0 0; color:var(--muted-foreground); font-size:.875rem; }
.card-content { padding:.5rem 1.5rem 1.5rem; }
.grid { display:grid; gap:1rem; grid-template-columns:repeat(auto-fit, minmax(12rem, 1fr)); }
.tile { background:var(--muted); border-radius:.5rem; padding:1rem; }
.tile-label { margin:0; font-size:.75rem; color:var(--muted-foreground); }
.tile-value { margin:.25rem 0 0; font-size:1.5rem; font-weight:600; }
.tile-note { margin:.25rem 0 0; font-size:.75rem; color:var(--muted-foreground); }
.table { width:100%; border-collapse:collapse; font-size:.875rem; }
.table th, .table td { text-align:left; padding:.5rem; border-bottom:1px solid var(--border); }
.badge { display:inline-flex; border-radius:999px; border:1px solid transparent; padding:.125rem .625rem; font-size:.75rem; font-weight:500; }
.badge-default { background:var(--muted); }
.badge-success { background:#d1fae5; color:#065f46; }
.badge-warning { background:#fef3c7; color:#92400e; }
.badge-danger { background:#ffe4e6; color:#9f1239; }
.badge-outline { border-color:var(--border); }
.input { height:2.5rem; border:1px solid var(--border); border-radius:.375rem; padding:.5rem .75rem; font-size:.875rem; background:var(--surface); }
.button { display:inline-block; border:0; border-radius:.375rem; padding:.5rem 1rem; background:var(--accent); color:#fff; text-decoration:none; font-size:.875rem; cursor:pointer; }
.banner-offline { border:1px solid #fecdd3; background:#fff1f2; color:#9f1239; border-radius:.75rem; padding:1rem; }
.contribution-up { color:#e11d48; font-weight:600; }
.contribution-down { color:#059669; font-weight:600; }
.page-header { display:flex; justify-content:space-between; align-items:center; gap:1rem; }
.toolbar { display:flex; align-items:center; gap:.75rem; margin-bottom:1rem; }
.what-if-result { margin-top:1rem; }
.markdown { line-height:1.6; font-size:.875rem; }
.markdown h1, .markdown h2, .markdown h3 { margin:1.25rem 0 .5rem; }
.markdown table { border-collapse:collapse; }
.markdown th, .markdown td { border:1px solid var(--border); padding:.375rem .625rem; text-align:left; }
.markdown code { background:var(--muted); border-radius:.25rem; padding:0 .25rem; }
"#;

fn sidebar(active_route: &str) -> String {
    let links: String = NAV_ITEMS
        .iter()
        .map(|(href, label)| {
            let class = if *href == active_route {
                r#" class="active" aria-current="page""#
            } else {
                ""
            };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
        })
        .collect();

    format!(
        r#"<aside class="sidebar">
  <div class="brand"><div class="brand-mark">CL</div><div><strong>CreditLens</strong><div class="muted">Risk dashboard</div></div></div>
  <nav class="nav">{}</nav>
  <div class="sidebar-footer">Demo project. Not for real lending decisions.</div>
</aside>"#,
        links
    )
}

fn top_nav() -> String {
    r#"<header class="topnav">
  <div><strong>CreditLens Underwriter Console</strong><div class="muted">Score decisions with explainability and fairness diagnostics.</div></div>
  <form method="get" action="/applicants"><input class="input" type="search" name="q" placeholder="Search applicants"></form>
</header>"#
        .to_string()
}

/// Wraps page content in the console shell.
///
/// `body` is already-rendered HTML; `title` is escaped.
pub fn page(title: &str, active_route: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} | CreditLens</title>
  <style>{styles}</style>
</head>
<body>
{sidebar}
<div class="main">
{top_nav}
<main class="content">
{body}
</main>
</div>
</body>
</html>
"#,
        title = escape_html(title),
        styles = STYLES,
        sidebar = sidebar(active_route),
        top_nav = top_nav(),
        body = body
    ))
}

/// Page heading with a muted subtitle.
pub fn heading(title: &str, subtitle: &str) -> String {
    format!(
        r#"<div><h1>{}</h1><p class="muted">{}</p></div>"#,
        escape_html(title),
        escape_html(subtitle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_nav_item() {
        let Html(html) = page("Fairness", "/fairness", "<p>body</p>");
        assert!(html.contains(r#"<a href="/fairness" class="active" aria-current="page">Fairness</a>"#));
        assert!(html.contains(r#"<a href="/dashboard">Dashboard</a>"#));
        assert!(html.contains("<title>Fairness | CreditLens</title>"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_top_nav_searches_applicants() {
        let Html(html) = page("Dashboard", "/dashboard", "");
        assert!(html.contains(r#"action="/applicants""#));
        assert!(html.contains(r#"name="q""#));
    }
}
