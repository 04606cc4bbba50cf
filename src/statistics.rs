use crate::error::AppError;
use crate::models::RawUsageEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://partners.cloud.vkplay.ru/api/v1/servers/statistic";

/// Seam over the billing statistics endpoint so the report pipeline can
/// be driven without the network in tests.
#[async_trait]
pub trait UsageSource {
    async fn fetch_statistics(
        &self,
        client: &Client,
        date: NaiveDate,
    ) -> Result<Vec<RawUsageEntry>, AppError>;
}

/// VK Play Cloud partner API adapter. Bearer-authenticated GET with the
/// report date as a query parameter; the response is a JSON array of
/// per-server entries.
pub struct VkPlaySource {
    bearer_token: String,
    base_url: Option<String>,
}

impl VkPlaySource {
    pub fn new(bearer_token: String, base_url: Option<String>) -> Self {
        Self {
            bearer_token,
            base_url,
        }
    }

    fn endpoint(&self, date: NaiveDate) -> Result<Url, AppError> {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut url = Url::parse(base)
            .map_err(|e| AppError::Config(format!("invalid statistics base url '{base}': {e}")))?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }
}

#[async_trait]
impl UsageSource for VkPlaySource {
    async fn fetch_statistics(
        &self,
        client: &Client,
        date: NaiveDate,
    ) -> Result<Vec<RawUsageEntry>, AppError> {
        let url = self.endpoint(date)?;
        let entries: Vec<RawUsageEntry> = client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(entries)
    }
}
