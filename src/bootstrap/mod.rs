//! Bootstrap for rfpbuddy
//!
//! Builds the component graph from configuration: completion provider,
//! embedding engine, vector store, retriever, generator and orchestrator.
//! Missing cloud credentials abort startup; an unreachable model server or
//! a missing collection only produce warnings.

use std::sync::Arc;
use tracing::{info, warn};

use crate::agent::AgenticOrchestrator;
use crate::cli::config::Config;
use crate::errors::{RfpError, Result};
use crate::generation::AnswerGenerator;
use crate::knowledge::{EmbeddingEngine, EmbeddingProvider, QdrantVectorStore, VectorStore};
use crate::providers::{CompletionProvider, GeminiProvider, OllamaProvider};
use crate::rag::ContextRetriever;
use crate::types::{Mode, Provider};

/// Startup check findings that do not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStatus {
    Ready,
    ModelServerUnreachable(String),
    CollectionMissing(String),
    VectorStoreUnreachable(String),
}

pub struct Bootstrap {
    config: Config,
    provider: Provider,
}

impl Bootstrap {
    pub fn new(config: Config, provider: Provider) -> Self {
        Self { config, provider }
    }

    /// Completion provider for the selected backend.
    ///
    /// Cloud selection without an API key fails with `MissingCredentials`.
    pub fn completion_provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        match self.provider {
            Provider::Local => Ok(Arc::new(OllamaProvider::new(self.config.ollama.clone())?)),
            Provider::Cloud => Ok(Arc::new(GeminiProvider::from_env(self.config.cloud.clone())?)),
        }
    }

    /// Wire an orchestrator from already-built seams
    pub fn assemble(
        config: &Config,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        completion: Arc<dyn CompletionProvider>,
    ) -> AgenticOrchestrator {
        let retriever = ContextRetriever::new(
            embedder,
            store,
            config.vector_store.collection.clone(),
            config.retrieval.clone(),
        );
        let generator = AnswerGenerator::new(completion);

        AgenticOrchestrator::new(retriever, generator).with_retries(config.agent.retries)
    }

    /// Build the full graph against live services
    pub async fn build(&self) -> Result<AgenticOrchestrator> {
        let completion = self.completion_provider()?;
        info!("Using provider: {} ({})", self.provider, completion.model_for(Mode::Proposal));

        if self.provider == Provider::Local {
            let status = self.probe_model_server().await?;
            report(&status);
        }

        let store = Arc::new(QdrantVectorStore::new(&self.config.vector_store.url)?);
        let status = self.probe_collection(&store).await;
        report(&status);

        let embedder = EmbeddingEngine::new()
            .map_err(|e| RfpError::EmbeddingError(format!("{:#}", e)))?;

        Ok(Self::assemble(&self.config, Arc::new(embedder), store, completion))
    }

    async fn probe_model_server(&self) -> Result<BootstrapStatus> {
        let ollama = OllamaProvider::new(self.config.ollama.clone())?;
        if ollama.health_check().await {
            Ok(BootstrapStatus::Ready)
        } else {
            Ok(BootstrapStatus::ModelServerUnreachable(ollama.endpoint().to_string()))
        }
    }

    async fn probe_collection(&self, store: &QdrantVectorStore) -> BootstrapStatus {
        let collection = &self.config.vector_store.collection;
        match store.collection_exists(collection).await {
            Ok(true) => BootstrapStatus::Ready,
            Ok(false) => BootstrapStatus::CollectionMissing(collection.clone()),
            Err(e) => BootstrapStatus::VectorStoreUnreachable(e.to_string()),
        }
    }
}

fn report(status: &BootstrapStatus) {
    match status {
        BootstrapStatus::Ready => {}
        BootstrapStatus::ModelServerUnreachable(endpoint) => {
            warn!("Model server not reachable at {}. Start it with: ollama serve", endpoint);
        }
        BootstrapStatus::CollectionMissing(collection) => {
            warn!("Collection '{}' not found. Ingest the knowledge base first.", collection);
        }
        BootstrapStatus::VectorStoreUnreachable(reason) => {
            warn!("Vector store check failed: {}", reason);
        }
    }
}
