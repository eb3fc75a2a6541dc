pub mod gateway;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This defines the single seam between the research pipeline and whatever
/// chat-completion backend is configured (the hosted gateway in production,
/// a programmed mock in tests).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result is the raw text of the model's reply.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
