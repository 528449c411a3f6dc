//! HTTP API for the portfolio site.
//!
//! Requests under the gated prefix (`/api/` by default) pass through the
//! rate limiter before any handler runs; `/healthz` is never counted.

mod error;
mod handlers;
mod middleware;
mod server;

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub use error::ApiError;
pub use handlers::PortfolioResponse;
pub use server::HttpServer;

use crate::config::{ContactConfig, FolioConfig, ServerConfig};
use crate::contact::{Mailer, ResendMailer};
use crate::content::{self, ContentStore, DEFAULT_MAIN_CATEGORIES};
use crate::error::Result;
use crate::ratelimit::{IdentityExtractor, RateLimiter};

const DEFAULT_RELATED_LIMIT: usize = 3;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentStore>,
    /// `None` when no email service is configured
    pub mailer: Option<Arc<dyn Mailer>>,
    pub limiter: Arc<RateLimiter>,
    pub identity: Arc<IdentityExtractor>,
    /// Path prefix subject to rate limiting; `None` disables the gate
    pub rate_limit_prefix: Option<Arc<str>>,
    pub related_limit: usize,
    /// Categories with their own portfolio tab
    pub main_categories: Arc<[String]>,
    pub contact: Arc<ContactConfig>,
    pub max_body_bytes: usize,
}

impl AppState {
    /// State with default limits and no mailer.
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self {
            content,
            mailer: None,
            limiter: Arc::new(RateLimiter::default()),
            identity: Arc::new(IdentityExtractor::default()),
            rate_limit_prefix: Some(Arc::from("/api/")),
            related_limit: DEFAULT_RELATED_LIMIT,
            main_categories: DEFAULT_MAIN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            contact: Arc::new(ContactConfig::default()),
            max_body_bytes: ServerConfig::default().max_body_bytes,
        }
    }

    /// Build the content store, mailer and limiter described by `config`.
    pub fn from_config(config: &FolioConfig) -> Result<Self> {
        let content = content::from_config(&config.content)?;
        let mailer = ResendMailer::from_config(&config.contact)?
            .map(|m| Arc::new(m) as Arc<dyn Mailer>);

        let rate_limiting = &config.rate_limiting;
        let limiter = RateLimiter::new(rate_limiting.policy(), rate_limiting.max_entries);
        let identity = IdentityExtractor::new(
            &rate_limiting.identity_header,
            &rate_limiting.fallback_identity,
        )?;

        Ok(Self {
            content,
            mailer,
            limiter: Arc::new(limiter),
            identity: Arc::new(identity),
            rate_limit_prefix: rate_limiting
                .enabled
                .then(|| Arc::from(rate_limiting.path_prefix.as_str())),
            related_limit: config.content.related_limit,
            main_categories: config.content.main_categories.iter().cloned().collect(),
            contact: Arc::new(config.contact.clone()),
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }
}

/// Assemble routes and middleware.
///
/// The request-id layer is outermost so throttled responses carry an id too.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/portfolio", get(handlers::portfolio_index))
        .route("/api/portfolio/featured", get(handlers::featured))
        .route("/api/portfolio/:slug", get(handlers::portfolio))
        .route("/api/portfolio/:slug/gallery", get(handlers::gallery))
        .route("/api/services", get(handlers::services))
        .route("/api/faqs", get(handlers::faqs))
        .route("/api/contact", post(handlers::contact))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ))
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state)
}
