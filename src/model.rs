//! # LLM Client Module
//!
//! This module wraps the completion model used to draft policies, with built-in
//! rate limiting to prevent API quota exhaustion.
//!
//! ## Key Components
//!
//! - `Client`: Holds the (rate-limited) completion model
//! - `RateLimitedCompletionModel`: A wrapper that adds rate limiting to any completion model

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::{completion::CompletionModel, providers::gemini};

use crate::error::{Error, Result};

pub mod ratelimited_completion;

#[cfg(test)]
pub mod mock_model;

pub use ratelimited_completion::RateLimitedCompletionModel;

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Completions allowed per minute
const COMPLETIONS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(30).unwrap();

#[derive(Debug, Clone)]
pub struct Client<C>
where
    C: CompletionModel,
{
    completion_model: C,
}

/// Raw response of a rate-limited completion, wrapping the inner model's raw response
pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

impl Client<RateLimitedCompletionModel<gemini::completion::CompletionModel>> {
    /// Build a Gemini client from `GEMINI_API_KEY`
    ///
    /// A missing key is a configuration error.
    pub fn new_gemini_from_env(model: &str) -> Result<Self> {
        let gemini_api_key = std::env::var(GEMINI_API_KEY_VAR).map_err(|_| {
            Error::Config(format!("{} environment variable must be set", GEMINI_API_KEY_VAR))
        })?;
        let gemini_client = gemini::Client::new(&gemini_api_key);
        Ok(Self::new_gemini(&gemini_client, model))
    }

    pub fn new_gemini(gemini_client: &gemini::Client, model: &str) -> Self {
        let limiter = RateLimiter::direct(Quota::per_minute(COMPLETIONS_PER_MINUTE));
        Self {
            completion_model: RateLimitedCompletionModel::new(
                gemini_client.completion_model(model),
                limiter,
            ),
        }
    }
}

impl<C> Client<C>
where
    C: CompletionModel,
{
    /// Wrap an arbitrary completion model
    pub fn new(completion_model: C) -> Self {
        Self { completion_model }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }
}
