use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    batch::IssuanceBatch,
    config::Config,
    error::{ForecastError, ServiceFault},
    model::RawForecastItem,
    region::GridPoint,
};

use super::ForecastSource;

pub const DEFAULT_BASE_URL: &str =
    "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getVilageFcst";

/// Marker of the gateway's XML fault envelope, sent even when JSON was requested.
const XML_FAULT_MARKER: &str = "<OpenAPI_ServiceResponse>";

const RESULT_OK: &str = "00";

/// Client for the KMA short-term (village) forecast endpoint.
#[derive(Debug, Clone)]
pub struct KmaClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl KmaClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.api_key().map(str::to_owned),
            base_url: config.base_url().to_owned(),
            http,
        })
    }

    async fn fetch_body(
        &self,
        api_key: &str,
        batch: &IssuanceBatch,
        grid: GridPoint,
    ) -> Result<String, ForecastError> {
        let nx = grid.nx.to_string();
        let ny = grid.ny.to_string();

        tracing::debug!(
            base_date = %batch.date,
            base_time = %batch.time,
            nx = grid.nx,
            ny = grid.ny,
            "requesting village forecast"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("serviceKey", api_key),
                ("pageNo", "1"),
                ("numOfRows", "1000"),
                ("dataType", "JSON"),
                ("base_date", batch.date.as_str()),
                ("base_time", batch.time.as_str()),
                ("nx", nx.as_str()),
                ("ny", ny.as_str()),
            ])
            .send()
            .await
            .map_err(ForecastError::network)?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, "forecast request failed");
            return Err(ForecastError::HttpStatus(status.as_u16()));
        }

        res.text().await.map_err(ForecastError::network)
    }
}

/// Turn a forecast response body into its item list, or the first problem found.
pub fn parse_body(body: &str) -> Result<Vec<RawForecastItem>, ForecastError> {
    if body.contains(XML_FAULT_MARKER) {
        let fault = ServiceFault::from_xml(body);
        tracing::warn!(?fault, body = %truncate_body(body), "gateway returned XML fault");
        return Err(ForecastError::Gateway(fault));
    }

    let parsed: KmaEnvelope = serde_json::from_str(body).map_err(ForecastError::InvalidJson)?;

    let response = parsed.response.ok_or(ForecastError::MissingHeader)?;
    let header = response.header.ok_or(ForecastError::MissingHeader)?;

    if header.result_code != RESULT_OK {
        tracing::warn!(
            code = %header.result_code,
            msg = %header.result_msg,
            "forecast service error"
        );
        return Err(ForecastError::ResultCode(header.result_msg));
    }

    response
        .body
        .and_then(|b| b.items)
        .and_then(|i| i.item)
        .ok_or(ForecastError::MissingItems)
}

#[derive(Debug, Deserialize)]
struct KmaEnvelope {
    response: Option<KmaResponse>,
}

#[derive(Debug, Deserialize)]
struct KmaResponse {
    header: Option<KmaHeader>,
    body: Option<KmaBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KmaHeader {
    result_code: String,
    #[serde(default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
struct KmaBody {
    items: Option<KmaItems>,
}

#[derive(Debug, Deserialize)]
struct KmaItems {
    item: Option<Vec<RawForecastItem>>,
}

#[async_trait]
impl ForecastSource for KmaClient {
    async fn fetch(
        &self,
        batch: &IssuanceBatch,
        grid: GridPoint,
    ) -> Result<Vec<RawForecastItem>, ForecastError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ForecastError::MissingApiKey)?;

        let body = self.fetch_body(api_key, batch, grid).await?;
        let items = parse_body(&body)?;

        tracing::debug!(count = items.len(), "received forecast items");
        Ok(items)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
