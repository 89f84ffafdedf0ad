use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::llm::{LlmProvider, LlmRequest};
use crate::news::{self, NewsProvider};

/// The finished blog post returned to the caller. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub title: String,
    pub meta_description: String,
    pub post_content: String,
}

/// Composes a blog post from a topic via three sequential generation calls,
/// optionally grounded in a recent-news summary fetched once up front.
///
/// Providers are injected at construction so tests can substitute fakes.
pub struct PostComposer {
    llm: Arc<dyn LlmProvider>,
    news: Option<Arc<dyn NewsProvider>>,
    body_model: Option<String>,
}

impl PostComposer {
    pub fn new(llm: Arc<dyn LlmProvider>, news: Option<Arc<dyn NewsProvider>>) -> Self {
        Self {
            llm,
            news,
            body_model: None,
        }
    }

    /// Use a different (typically larger) model for the post body step.
    pub fn with_body_model(mut self, model: impl Into<String>) -> Self {
        self.body_model = Some(model.into());
        self
    }

    pub fn news_enabled(&self) -> bool {
        self.news.is_some()
    }

    /// Generate title, meta description and body for a topic.
    ///
    /// The steps are strictly sequential: the meta-description prompt embeds
    /// the title produced by the first call. The news summary is fetched once
    /// and the same snapshot is reused across all three prompts. Any
    /// generation failure propagates immediately; no partial result is
    /// returned. News lookup failures never propagate (absorbed in the news
    /// module).
    pub async fn generate_post(&self, topic: &str) -> Result<GeneratedPost> {
        let news_summary = match &self.news {
            Some(provider) => news::best_effort_summary(provider.as_ref(), topic).await,
            None => String::new(),
        };
        let context_note = if news_summary.is_empty() {
            String::new()
        } else {
            format!("\n\nHere are the latest news on the topic:\n{}", news_summary)
        };
        info!(
            topic,
            with_news = !context_note.is_empty(),
            "generating blog post"
        );

        let title_prompt = format!(
            "Come up with a catchy title for a blog post on the topic: {}.{}",
            topic, context_note
        );
        let title = self
            .complete(title_prompt, 50, None)
            .await
            .context("title generation failed")?;

        // Depends on the title just produced, not on the raw topic
        let meta_prompt = format!(
            "Write a short but informative meta description for a blog post titled: {}.{}",
            title, context_note
        );
        let meta_description = self
            .complete(meta_prompt, 100, None)
            .await
            .context("meta description generation failed")?;

        let body_prompt = format!(
            "Write a detailed and engaging blog post on the topic: {}. \
             Use short paragraphs, subheadings, examples and keywords for \
             readability and SEO.{}",
            topic, context_note
        );
        let post_content = self
            .complete(body_prompt, 2048, self.body_model.clone())
            .await
            .context("post body generation failed")?;

        Ok(GeneratedPost {
            title,
            meta_description,
            post_content,
        })
    }

    async fn complete(
        &self,
        prompt: String,
        max_tokens: usize,
        model: Option<String>,
    ) -> Result<String> {
        let response = self
            .llm
            .generate(LlmRequest {
                prompt,
                max_tokens: Some(max_tokens),
                temperature: Some(0.7),
                timeout_seconds: None,
                model,
            })
            .await?;
        Ok(response.content.trim().to_string())
    }
}
