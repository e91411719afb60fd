//! HTTP code review service backed by the Anthropic Messages API.
//!
//! Submissions arrive on `POST /api/review`, pass a basic-auth check and a
//! per-IP sliding-window rate limit, then hit an in-memory LRU cache keyed by
//! a hash of the submission. On a miss the service builds a deterministic
//! review prompt, calls the configured model, parses its JSON reply into
//! structured feedback, and caches the result. `GET /health` stays open for
//! probes.
//!
//! Layering, bottom to top:
//!
//! - [`config`] resolves everything tunable from the environment once.
//! - [`auth`], [`ratelimit`], [`cache`] are self-contained policy pieces.
//! - [`providers`] hides the model API behind [`providers::LlmProvider`].
//! - [`review`] composes the above into the request pipeline.
//! - [`api`] is the axum surface; it owns HTTP status codes and bodies.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod providers;
pub mod ratelimit;
pub mod review;

pub use error::{CritiqError, Result};
