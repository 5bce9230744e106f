pub mod user;
pub mod load;
pub mod view;
pub mod label_button;
#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Context;
use log::debug;
use reqwest::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;
use crate::load::UserSource;

pub use label_button::{label_button_html, LabelButton, LinkTarget};
pub use load::{EmptyCause, LoadError, LoadOutcome};
pub use user::{User, UserCollection, UserId};
pub use view::{ListEntry, LoadStatus, UserListPage, UserListView};

const USERS_URL: &str = "http://127.0.0.1:8000/users/";

/// The endpoint the user list is read from, unless configured otherwise
pub static DEFAULT_ENDPOINT: once_cell::sync::Lazy<Url> = once_cell::sync::Lazy::new(|| {
    Url::parse(USERS_URL).expect("Default users endpoint should be a valid url")
});

/// Settings for a [`UserListView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Where the users envelope is fetched from with a plain `GET`
    pub endpoint: Url,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.clone() }
    }
}

impl ViewConfig {

    /// Uses the given `endpoint` instead of [`DEFAULT_ENDPOINT`]
    pub fn with_endpoint(endpoint: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid users endpoint: {endpoint}"))?;
        Ok(Self { endpoint })
    }

}

/// A wrapped reqwest [`Client`], that reads the users envelope from a fixed endpoint
#[derive(Debug, Clone)]
pub struct UsersClient {
    pub client: Client,
    pub endpoint: Url,
}

impl UsersClient {

    pub fn new(config: &ViewConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: Self::make_client()?,
            endpoint: config.endpoint.clone(),
        })
    }

    fn make_client() -> anyhow::Result<Client> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Accept", HeaderValue::from_static("application/json"));
        // No timeout: a request that never answers just leaves the list empty
        ClientBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .gzip(true)
            .build()
            .context("Could not build reqwest client")
    }

    pub fn get(&self, url: &Url) -> reqwest::RequestBuilder {
        #[cfg(feature = "verbose")]
        {
            debug!("get: {}", url.as_str());
        }
        self.client.get(url.clone())
    }

}

impl UserSource for UsersClient {

    async fn fetch_body(&self) -> anyhow::Result<String> {
        let response = self.get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("Could not reach {}", self.endpoint))?;
        // The body is still read, error responses usually just lack the `users` field
        if !response.status().is_success() {
            debug!("Users endpoint answered with status code: {}", response.status());
        }
        response.text()
            .await
            .context("Could not read users response body")
    }

}
