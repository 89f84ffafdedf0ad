use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Keyword-search news provider. Production uses [`CurrentsClient`]; tests
/// substitute a fake.
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, topic: &str) -> Result<Vec<NewsArticle>>;
}

/// A single article as returned by the news provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsArticle>,
}

/// Client for the Currents search API (`/v1/search`).
///
/// A single attempt per lookup, no retry; callers that want the
/// degrade-not-fail behavior go through [`best_effort_summary`].
pub struct CurrentsClient {
    api_url: String,
    api_key: String,
    language: String,
    client: Client,
}

impl CurrentsClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            language: language.into(),
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl NewsProvider for CurrentsClient {
    async fn search(&self, topic: &str) -> Result<Vec<NewsArticle>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("keywords", topic),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .context("news HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("news API error {}: {}", status, body);
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse news response")?;

        debug!(count = body.news.len(), "news search returned");
        Ok(body.news)
    }
}

/// Format up to the first 3 articles as a newline-joined bullet list.
/// An empty slice yields an empty string ("no news" is a valid value).
pub fn summarize_articles(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .take(3)
        .map(|a| format!("- {}: {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Degrade-not-fail boundary: news enrichment is best-effort and must never
/// block post generation. Provider failures are logged and collapsed to an
/// empty summary here; `search` itself keeps the error observable for tests.
pub async fn best_effort_summary(provider: &dyn NewsProvider, topic: &str) -> String {
    match provider.search(topic).await {
        Ok(articles) => summarize_articles(&articles),
        Err(e) => {
            warn!("news lookup failed, continuing without context: {:#}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn summary_formats_and_joins() {
        let articles = vec![
            article("Solar surge", "Panel installs doubled"),
            article("Wind record", "Offshore farms expand"),
        ];

        let summary = summarize_articles(&articles);
        assert_eq!(
            summary,
            "- Solar surge: Panel installs doubled\n- Wind record: Offshore farms expand"
        );
    }

    #[test]
    fn summary_takes_first_three_in_order() {
        let articles = vec![
            article("one", "a"),
            article("two", "b"),
            article("three", "c"),
            article("four", "d"),
        ];

        let summary = summarize_articles(&articles);
        assert_eq!(summary, "- one: a\n- two: b\n- three: c");
    }

    #[test]
    fn empty_articles_give_empty_summary() {
        assert_eq!(summarize_articles(&[]), "");
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"news": [{"title": "Bare headline"}]}"#).unwrap();
        assert_eq!(summarize_articles(&parsed.news), "- Bare headline: ");
    }
}
