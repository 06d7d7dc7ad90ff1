//! Utility to re-score a stored applicant with edited features.
//!
//! Usage: `whatif_score <applicant_id> [FEATURE=value ...]`

use creditlens_console::api_client::ScoringApiClient;
use creditlens_console::applicants::{merge_features, parse_override};
use creditlens_console::config::Config;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <applicant_id> [FEATURE=value ...]", args[0]);
        std::process::exit(2);
    }

    let applicant_id: i64 = args[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("applicant id must be an integer, got '{}'", args[1]))?;
    let overrides = args[2..]
        .iter()
        .map(|arg| parse_override(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let config = Config::from_env()?;
    let client = ScoringApiClient::new(config.api_base_url.clone())?;

    let applicant = client
        .get_applicant(applicant_id)
        .await
        .ok_or_else(|| anyhow::anyhow!("Applicant CL-{} is unavailable", applicant_id))?;
    let base = client
        .get_applicant_score(applicant_id)
        .await
        .ok_or_else(|| anyhow::anyhow!("Score for CL-{} is unavailable", applicant_id))?;

    let payload = merge_features(&applicant.feature_vector(), overrides.iter().cloned());
    let what_if = client
        .score_applicant(&payload)
        .await
        .ok_or_else(|| anyhow::anyhow!("What-if scoring failed for CL-{}", applicant_id))?;

    println!("Applicant {}", applicant.display_id());
    for (key, value) in &overrides {
        println!("  {} = {}", key, value);
    }
    println!("Base PD:    {:.4} ({})", base.pd, base.risk_bucket);
    println!("What-if PD: {:.4} ({})", what_if.pd, what_if.risk_bucket);
    println!("Change:     {:+.4}", what_if.pd - base.pd);

    Ok(())
}
