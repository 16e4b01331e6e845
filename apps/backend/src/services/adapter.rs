//! Adapter selection for pass boundaries.

use async_trait::async_trait;
use flashgenius_core::{AdaptationRequest, Deck, DeckAdapter, PerformanceReorder, ServiceError};

use crate::config::AdaptationMode;
use crate::services::llm::LlmClient;

/// Adapter configured at startup.
#[derive(Clone)]
pub enum AdaptationBackend {
    /// Ask the model provider to reorder.
    Model(LlmClient),
    /// Reorder locally by miss count.
    Local(PerformanceReorder),
}

impl AdaptationBackend {
    pub fn from_mode(mode: AdaptationMode, llm: &LlmClient) -> Self {
        match mode {
            AdaptationMode::Model => Self::Model(llm.clone()),
            AdaptationMode::Local => Self::Local(PerformanceReorder),
        }
    }
}

#[async_trait]
impl DeckAdapter for AdaptationBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Model(client) => client.name(),
            Self::Local(reorder) => reorder.name(),
        }
    }

    async fn adapt(&self, request: &AdaptationRequest) -> Result<Deck, ServiceError> {
        tracing::debug!(
            adapter = self.name(),
            cards = request.flashcards.len(),
            answers = request.user_performance.len(),
            "adapting deck"
        );
        match self {
            Self::Model(client) => client.adapt(request).await,
            Self::Local(reorder) => reorder.adapt(request).await,
        }
    }
}
