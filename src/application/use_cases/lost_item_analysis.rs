use crate::application::use_cases::prompts::build_lost_item_prompt;
use crate::domain::activity::ActivityEntry;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::prompt::PromptLanguage;
use crate::infrastructure::llm_clients::LLMClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Asks the model to rank the visited locations by how likely the item was lost there.
///
/// Holds no mutable state; one instance can serve any number of concurrent calls.
pub struct LostItemAnalysisUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
    language: PromptLanguage,
}

impl LostItemAnalysisUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        config: LLMConfig,
        language: PromptLanguage,
    ) -> Self {
        Self {
            llm_client,
            config,
            language,
        }
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    pub fn build_prompt(&self, activities: &[ActivityEntry], lost_item: Option<&str>) -> String {
        build_lost_item_prompt(activities, lost_item, self.language)
    }

    /// Returns the model's answer verbatim.
    pub async fn analyze(
        &self,
        activities: &[ActivityEntry],
        lost_item: Option<&str>,
    ) -> Result<String> {
        self.ensure_credential()?;
        let prompt = self.build_prompt(activities, lost_item);
        self.generate(&prompt, activities.len()).await
    }

    /// Like [`analyze`](Self::analyze), but gives up as soon as `cancel` fires.
    ///
    /// Dropping the pending request aborts the underlying HTTP call.
    pub async fn analyze_with_cancellation(
        &self,
        activities: &[ActivityEntry],
        lost_item: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.ensure_credential()?;
        let prompt = self.build_prompt(activities, lost_item);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(activity_count = activities.len(), "Analysis cancelled by caller");
                Err(AppError::Cancelled("Analysis was cancelled".to_string()))
            }
            result = self.generate(&prompt, activities.len()) => result,
        }
    }

    fn ensure_credential(&self) -> Result<()> {
        if self.config.credential().is_none() {
            return Err(AppError::Configuration(
                "Gemini API key not found. Set GEMINI_API_KEY in the environment or .env file"
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn generate(&self, prompt: &str, activity_count: usize) -> Result<String> {
        debug!(
            model = %self.config.model,
            activity_count,
            prompt_chars = prompt.chars().count(),
            "Requesting lost item analysis"
        );

        match self.llm_client.generate(&self.config, prompt).await {
            Ok(text) => Ok(text),
            Err(err) => {
                error!(error = %err, model = %self.config.model, "Error analyzing activities");
                Err(err)
            }
        }
    }
}
