//! The text-generation capability the conversation depends on.

use crate::errors::AppResult;

/// Text produced by one generator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// Token cost reported by the backend, or an estimate.
    pub tokens_used: u64,
}

/// Anything that turns a prompt into text.
///
/// Implementations must return within a bounded time; a timeout is reported
/// as an error like any other failure.
pub trait Generator {
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> AppResult<Generation>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> AppResult<Generation> {
        (**self).generate(prompt, max_tokens, temperature)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> AppResult<Generation> {
        (**self).generate(prompt, max_tokens, temperature)
    }
}

/// Rough token count used when the backend does not report one.
pub fn estimate_tokens(prompt: &str, response: &str) -> u64 {
    (prompt.split_whitespace().count() + response.split_whitespace().count()) as u64
}
