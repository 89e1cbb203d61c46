//! Fetching deck documents from disk or over HTTP

use std::fs;
use std::time::Duration;

use reqwest::blocking::Client;

use super::errors::FetchError;
use super::location::Location;

/// Source of raw deck documents
pub trait DeckFetcher {
    fn fetch(&self, location: &Location) -> Result<String, FetchError>;
}

/// Reads local files and, when enabled, downloads http(s) documents
pub struct DefaultFetcher {
    client: Option<Client>,
}

impl DefaultFetcher {
    /// Fetcher that can also reach remote decks
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Some(client),
        })
    }

    /// Fetcher restricted to the local filesystem
    pub fn local_only() -> Self {
        Self { client: None }
    }
}

impl DeckFetcher for DefaultFetcher {
    fn fetch(&self, location: &Location) -> Result<String, FetchError> {
        log::debug!("Fetching deck document {}", location);
        match location {
            Location::File(path) => Ok(fs::read_to_string(path)?),
            Location::Remote(url) => {
                let client = self
                    .client
                    .as_ref()
                    .ok_or_else(|| FetchError::RemoteDisabled(url.to_string()))?;

                let response = client.get(url.clone()).send()?;
                if !response.status().is_success() {
                    return Err(FetchError::Status(
                        response.status().as_u16(),
                        url.to_string(),
                    ));
                }
                Ok(response.text()?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_local_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deck.json");
        fs::write(&path, "{}").unwrap();

        let fetcher = DefaultFetcher::local_only();
        let text = fetcher.fetch(&Location::File(path)).unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let fetcher = DefaultFetcher::local_only();
        let result = fetcher.fetch(&Location::File(temp.path().join("missing.json")));
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[test]
    fn test_remote_disabled() {
        let fetcher = DefaultFetcher::local_only();
        let location = Location::parse("https://example.com/deck.json").unwrap();
        assert!(matches!(
            fetcher.fetch(&location),
            Err(FetchError::RemoteDisabled(_))
        ));
    }
}
