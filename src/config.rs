pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CreditLens scoring API.
    pub api_base_url: String,
    pub port: u16,
    /// Markdown file shown on the model card page.
    pub model_card_path: String,
    /// Page size requested from `GET /applicants`.
    pub applicant_list_limit: u32,
    /// Maximum accepted request body, in bytes.
    pub max_request_size: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("API_BASE_URL")
                .or_else(|_| std::env::var("CREDITLENS_API_URL"))
                .or_else(|_| Ok::<_, anyhow::Error>(DEFAULT_API_BASE_URL.to_string()))
                .and_then(|url| {
                    validate_base_url(&url)?;
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_card_path: std::env::var("MODEL_CARD_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "docs/model-card.md".to_string()),
            applicant_list_limit: std::env::var("APPLICANT_LIST_LIMIT")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .ok()
                .filter(|limit: &u32| *limit > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("APPLICANT_LIST_LIMIT must be a positive integer")
                })?,
            max_request_size: std::env::var("MAX_REQUEST_SIZE")
                .unwrap_or_else(|_| "1000000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_REQUEST_SIZE must be a number of bytes"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("API Base URL: {}", config.api_base_url);
        tracing::debug!("Model card path: {}", config.model_card_path);
        tracing::debug!("Applicant list limit: {}", config.applicant_list_limit);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Checks that an API base URL is non-empty and uses http(s).
pub fn validate_base_url(url: &str) -> anyhow::Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("API_BASE_URL cannot be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("API_BASE_URL must start with http:// or https://");
    }
    Ok(())
}
