pub mod rate_limit;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod artifact;
    pub mod codes;
    pub mod common;
    pub mod health;
    pub mod products;
    pub mod verify;
}

pub use rate_limit::RateLimiter;
pub use router::{create_router, ApiDoc};
pub use types::AppState;
