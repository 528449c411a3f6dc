//! Fixed-window request rate limiting.

mod identity;
mod limiter;
mod record;
mod store;

pub use identity::{ClientIdentity, IdentityExtractor};
pub use limiter::RateLimiter;
pub use record::{Decision, RateLimitPolicy, RateLimitRecord};
pub use store::{InMemoryStore, RateLimitStore};
