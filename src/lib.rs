//! Folio - Event Photography Portfolio Backend
//!
//! This crate serves the dynamic parts of a photography portfolio site: it
//! lays project galleries out into rows of paired images, gates its API
//! behind a per-client fixed-window rate limiter, reads projects from a
//! headless content store and forwards contact form enquiries by email.

pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod gallery;
pub mod http;
pub mod ratelimit;
