use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::WordSource;
use crate::error::PracticeError;

pub const DATAMUSE_ENDPOINT: &str = "https://api.datamuse.com/words";
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// One entry of the word-association response; other fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Candidate {
    pub word: String,
}

/// Looks up words related in meaning to a topic
#[derive(Debug, Clone)]
pub struct TopicLookup {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl TopicLookup {
    pub fn new(max_results: usize) -> Self {
        Self::with_endpoint(DATAMUSE_ENDPOINT, max_results)
    }

    pub fn with_endpoint<S: Into<String>>(endpoint: S, max_results: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            max_results,
        }
    }

    pub fn fetch(&self, topic: &str) -> Result<Vec<String>, PracticeError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PracticeError::EmptyTopic);
        }

        debug!(topic, endpoint = %self.endpoint, "fetching topic words");
        let max = self.max_results.to_string();
        let candidates: Vec<Candidate> = self
            .client
            .get(&self.endpoint)
            .query(&[("ml", topic), ("max", max.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())
            .map_err(PracticeError::fetch)?;

        let words = collect_words(candidates, self.max_results)?;
        info!(topic, count = words.len(), "fetched topic words");
        Ok(words)
    }
}

impl WordSource for TopicLookup {
    fn words(&self, selector: &str) -> Result<Vec<String>, PracticeError> {
        self.fetch(selector)
    }
}

/// Keeps service order, caps at `max`, and rejects an empty result.
pub fn collect_words(candidates: Vec<Candidate>, max: usize) -> Result<Vec<String>, PracticeError> {
    let words: Vec<String> = candidates
        .into_iter()
        .map(|c| c.word)
        .filter(|w| !w.trim().is_empty())
        .take(max)
        .collect();

    if words.is_empty() {
        Err(PracticeError::EmptyResult)
    } else {
        Ok(words)
    }
}
