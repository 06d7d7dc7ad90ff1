//! External service integrations.

pub mod scoring_api {
    pub use crate::api_client::*;
    pub use crate::fallbacks;
}
