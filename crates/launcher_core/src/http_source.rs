use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Instance, NewsItem},
    error::ApiError,
};
use tracing::debug;
use url::Url;

use crate::{error::FetchError, source::DataSource};

/// Backend reached over HTTP; serves `GET {base}/instances` and
/// `GET {base}/news` as JSON arrays.
pub struct HttpDataSource {
    http: Client,
    base_url: Url,
}

impl HttpDataSource {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url.trim())?;
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| FetchError::Unavailable(format!("invalid endpoint {path}: {err}")))?;
        debug!("fetch: GET {url}");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        if !status.is_success() {
            return Err(match serde_json::from_slice::<ApiError>(&body) {
                Ok(api) => FetchError::Api(api),
                Err(_) => FetchError::Status(status.as_u16()),
            });
        }

        serde_json::from_slice(&body).map_err(|err| FetchError::Parse(err.to_string()))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn list_instances(&self) -> Result<Vec<Instance>, FetchError> {
        self.get_list("instances").await
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>, FetchError> {
        self.get_list("news").await
    }
}

#[cfg(test)]
#[path = "tests/http_source_tests.rs"]
mod tests;
