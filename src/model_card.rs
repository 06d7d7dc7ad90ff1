use crate::api_client::ScoringApiClient;
use pulldown_cmark::{html, Event, Options, Parser};
use std::path::Path;

pub const MISSING_MODEL_CARD: &str =
    "# Model Card\n\nModel card is missing. Add docs/model-card.md.";

/// Loads the model card markdown.
///
/// Reads the local file first; if it doesn't exist, asks the scoring API
/// for its copy, and finally falls back to a placeholder.
pub async fn load(path: impl AsRef<Path>, client: &ScoringApiClient) -> String {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(markdown) => return markdown,
        Err(e) => {
            tracing::debug!("Model card not readable at {}: {}", path.display(), e);
        }
    }

    if let Some(markdown) = client.get_model_card().await {
        return markdown;
    }

    tracing::warn!("No model card available locally or from the scoring API");
    MISSING_MODEL_CARD.to_string()
}

/// Renders model card markdown (with GFM tables) to HTML.
///
/// Raw HTML in the source is emitted as escaped text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}
