use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DICTIONARY_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

pub const NOT_FOUND: &str = "Definition not found.";
pub const LOOKUP_FAILED: &str = "Error fetching definition.";

/// Short gloss for a word. Always returns something displayable.
pub trait DefinitionLookup: Send + Sync {
    fn define(&self, word: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct Entry {
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    definitions: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    definition: String,
}

/// `[0].meanings[0].definitions[0].definition`, if the body has that shape.
pub fn first_definition(body: &str) -> Option<String> {
    let entries: Vec<Entry> = serde_json::from_str(body).ok()?;
    let sense = entries
        .into_iter()
        .next()?
        .meanings
        .into_iter()
        .next()?
        .definitions
        .into_iter()
        .next()?;
    Some(sense.definition)
}

#[derive(Debug, Clone)]
pub struct DictionaryApi {
    client: Client,
    endpoint: String,
}

impl DictionaryApi {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_endpoint(DICTIONARY_ENDPOINT)
    }

    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint with `word` appended as one encoded path segment.
    pub fn url_for(&self, word: &str) -> Option<Url> {
        let mut url = Url::parse(&self.endpoint).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(word);
        Some(url)
    }

    fn lookup(&self, word: &str) -> Result<String, &'static str> {
        let url = self.url_for(word).ok_or(LOOKUP_FAILED)?;
        let resp = self.client.get(url).send().map_err(|e| {
            warn!(word, error = %e, "definition request failed");
            LOOKUP_FAILED
        })?;

        if resp.status() != StatusCode::OK {
            debug!(word, status = %resp.status(), "no definition");
            return Err(NOT_FOUND);
        }

        let body = resp.text().map_err(|e| {
            warn!(word, error = %e, "definition body unreadable");
            LOOKUP_FAILED
        })?;

        first_definition(&body).ok_or_else(|| {
            warn!(word, "unexpected definition shape");
            LOOKUP_FAILED
        })
    }
}

impl DefinitionLookup for DictionaryApi {
    fn define(&self, word: &str) -> String {
        self.lookup(word).unwrap_or_else(str::to_string)
    }
}
