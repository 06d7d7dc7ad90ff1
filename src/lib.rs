//! CreditLens Underwriter Console Library
//!
//! Server-rendered dashboard over the CreditLens scoring API: portfolio
//! metrics, applicant review with what-if re-scoring, fairness diagnostics,
//! drift monitoring and the model card.
//!
//! # Modules
//!
//! - `api`: HTTP layer (handlers and router).
//! - `core`: Applicant logic, data models and errors.
//! - `integrations`: Scoring API client.
//! - `api_client`: Typed client for the scoring API.
//! - `applicants`: Search, summaries, what-if merging and number formatting.
//! - `charts`: Inline SVG charts.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `fallbacks`: Bundled metrics and fairness report used when the API is down.
//! - `handlers`: Page handlers.
//! - `layout`: Page shell and navigation.
//! - `model_card`: Model card loading.
//! - `models`: Wire data models.
//! - `routes`: Router construction.
//! - `ui`: Presentational HTML fragments.

pub mod api;
pub mod core;
pub mod integrations;

pub mod api_client;
pub mod applicants;
pub mod charts;
pub mod config;
pub mod errors;
pub mod fallbacks;
pub mod handlers;
pub mod layout;
pub mod model_card;
pub mod models;
pub mod routes;
pub mod ui;
