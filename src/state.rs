use std::sync::Arc;

use crate::config::Config;
use crate::services::{AnthropicClient, CompletionClient, DocConverter, PdfProcessor};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processor: PdfProcessor,
    pub completion: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    /// Build the state from configuration. The language model client is only
    /// created when an API key is configured.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let completion = AnthropicClient::from_config(&config.llm)?
            .map(|client| Arc::new(client) as Arc<dyn CompletionClient>);

        Ok(Self {
            processor: PdfProcessor::new(config.max_text_length),
            config: Arc::new(config),
            completion,
        })
    }

    pub fn with_completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    pub fn converter(&self) -> Option<DocConverter> {
        self.completion
            .clone()
            .map(|client| DocConverter::new(self.processor.clone(), client))
    }
}
