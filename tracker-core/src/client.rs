use reqwest::{redirect, Client};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{CountrySummary, HistoricalSeries, Region, Snapshot};

pub const USER_AGENT: &str = "CovidTracker/0.1";
const MAX_REDIRECTS: usize = 5;

/// Read-only client for the disease.sh style endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    config: ApiConfig,
}

impl ApiClient {
    /// Builds the HTTP client once: user agent, redirect limit and the
    /// configured timeout apply to every request it sends.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn snapshot_url(&self, region: &Region) -> Result<Url, FetchError> {
        let url = match region {
            Region::Worldwide => self.base_url.join("all")?,
            Region::Country(code) => self.base_url.join(&format!("countries/{code}"))?,
        };
        Ok(url)
    }

    pub fn countries_url(&self) -> Result<Url, FetchError> {
        Ok(self.base_url.join("countries")?)
    }

    pub fn history_url(&self) -> Result<Url, FetchError> {
        let mut url = self.base_url.join("historical/all")?;
        url.query_pairs_mut()
            .append_pair("lastdays", &self.config.history_days.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn fetch_global_snapshot(&self) -> Result<Snapshot, FetchError> {
        self.fetch_snapshot(&Region::Worldwide).await
    }

    pub async fn fetch_country_snapshot(&self, code: &str) -> Result<Snapshot, FetchError> {
        self.fetch_snapshot(&Region::Country(code.to_string())).await
    }

    pub async fn fetch_snapshot(&self, region: &Region) -> Result<Snapshot, FetchError> {
        self.get_json(self.snapshot_url(region)?).await
    }

    pub async fn fetch_countries(&self) -> Result<Vec<CountrySummary>, FetchError> {
        let countries: Vec<CountrySummary> = self.get_json(self.countries_url()?).await?;
        if countries.is_empty() {
            return Err(FetchError::EmptyResult("countries"));
        }
        Ok(countries)
    }

    pub async fn fetch_historical(&self) -> Result<HistoricalSeries, FetchError> {
        self.get_json(self.history_url()?).await
    }
}
