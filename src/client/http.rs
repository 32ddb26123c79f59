//! HTTP adapter for the library REST API
//!
//! The server confirms mutations with a fixed `msg` string in the response
//! body. That comparison is kept here; callers only see [`MutationOutcome`].

use async_trait::async_trait;
use config::ConfigError;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use std::time::Duration;

use super::{BookApi, MutationOutcome};
use crate::{
    config::ApiConfig,
    error::AppResult,
    models::book::{BookId, BookPayload, BookRecord},
};

/// `msg` value confirming an update
pub const UPDATE_COMPLETE: &str = "수정완료";

/// `msg` value confirming a delete
pub const DELETE_COMPLETE: &str = "삭제완료";

#[derive(Debug, Deserialize)]
struct LegacyReply {
    #[serde(default)]
    msg: Option<String>,
}

/// Translate a mutation response body into a typed outcome
fn interpret_reply(body: &str, marker: &str) -> MutationOutcome {
    match serde_json::from_str::<LegacyReply>(body) {
        Ok(LegacyReply { msg: Some(msg) }) if msg == marker => MutationOutcome::Applied,
        Ok(LegacyReply { msg: Some(msg) }) => MutationOutcome::Rejected {
            reason: format!("unexpected msg {:?}", msg),
        },
        Ok(LegacyReply { msg: None }) => MutationOutcome::Rejected {
            reason: "response has no msg".to_string(),
        },
        Err(e) => MutationOutcome::Rejected {
            reason: format!("undecodable response body: {}", e),
        },
    }
}

#[derive(Clone)]
pub struct HttpBookApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBookApi {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Message(format!("Invalid api.base_url {:?}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Message(format!(
                "api.base_url {:?} cannot be used as a base URL",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Build `{base}/{segments...}`, escaping each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_mutation(&self, builder: RequestBuilder, marker: &str) -> AppResult<MutationOutcome> {
        let response = builder.send().await?.error_for_status()?;
        let body = response.text().await?;
        let outcome = interpret_reply(&body, marker);
        if let MutationOutcome::Rejected { reason } = &outcome {
            tracing::debug!("Mutation not confirmed: {}", reason);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn fetch_book(&self, id: &BookId) -> AppResult<BookRecord> {
        let url = self.endpoint(&["api", "books", id.as_str()]);
        let book = self
            .request(Method::GET, url)
            .send()
            .await?
            .error_for_status()?
            .json::<BookRecord>()
            .await?;
        Ok(book)
    }

    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> AppResult<MutationOutcome> {
        let url = self.endpoint(&["admin", "books", id.as_str()]);
        let builder = self.request(Method::PATCH, url).json(payload);
        self.send_mutation(builder, UPDATE_COMPLETE).await
    }

    async fn delete_book(&self, id: &BookId) -> AppResult<MutationOutcome> {
        let url = self.endpoint(&["admin", "books", id.as_str()]);
        let builder = self.request(Method::DELETE, url);
        self.send_mutation(builder, DELETE_COMPLETE).await
    }
}
