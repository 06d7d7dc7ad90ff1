// Domain-layer modules and shared errors/models
pub mod applicants {
    pub use crate::applicants::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
