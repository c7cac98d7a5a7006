use chrono::NaiveDateTime;
use tracing::instrument;

use crate::{
    batch::{kst_now, select_batch},
    config::Config,
    decode::decode,
    error::ForecastError,
    model::{ToolPayload, WeatherReport, WeatherResult},
    provider::{ForecastSource, KmaClient},
    region,
    tool::GetWeatherArgs,
};

/// Runs a weather query end to end: region, batch, fetch, decode.
#[derive(Debug)]
pub struct WeatherService {
    source: Box<dyn ForecastSource>,
}

impl WeatherService {
    pub fn new(source: Box<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Service backed by the KMA endpoint described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Box::new(KmaClient::from_config(config)?)))
    }

    /// Forecast for `location` as of the current time in Korea.
    pub async fn get_weather(&self, location: &str) -> WeatherResult {
        self.get_weather_at(location, kst_now()).await
    }

    #[instrument(skip(self))]
    pub async fn get_weather_at(&self, location: &str, now: NaiveDateTime) -> WeatherResult {
        let region = region::resolve(location)?;
        let batch = select_batch(now);

        tracing::info!(
            region = region.name,
            base_date = %batch.date,
            base_time = %batch.time,
            "fetching forecast"
        );

        let items = self.source.fetch(&batch, region.grid()).await?;
        if items.is_empty() {
            return Err(ForecastError::NoItems);
        }

        let decoded = decode(&items, now, &batch.date);
        if decoded.forecasts.is_empty() {
            tracing::info!(items = items.len(), "no upcoming forecast slots in batch");
        }

        Ok(WeatherReport {
            location: region.name.to_string(),
            date: batch.date,
            time: batch.time,
            forecasts: decoded.forecasts,
            current: decoded.current,
        })
    }

    /// Execute the `get_weather` tool with its JSON arguments.
    ///
    /// Always returns a JSON payload; failures become `{"error": "..."}`.
    pub async fn call_tool(&self, arguments: &str) -> String {
        let result = match serde_json::from_str::<GetWeatherArgs>(arguments) {
            Ok(args) => self.get_weather(&args.location).await,
            Err(err) => Err(ForecastError::InvalidToolArguments(err)),
        };

        if let Err(err) = &result {
            tracing::warn!(kind = ?err.kind(), error = %err, "weather tool failed");
        }

        ToolPayload::from(result).to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        batch::IssuanceBatch,
        error::ErrorKind,
        model::{Category, RawForecastItem},
        region::GridPoint,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory source that records every request it serves.
    #[derive(Debug, Default)]
    struct FakeSource {
        items: Vec<RawForecastItem>,
        fail_with_status: Option<u16>,
        calls: Mutex<Vec<(IssuanceBatch, GridPoint)>>,
    }

    #[async_trait]
    impl ForecastSource for FakeSource {
        async fn fetch(
            &self,
            batch: &IssuanceBatch,
            grid: GridPoint,
        ) -> Result<Vec<RawForecastItem>, ForecastError> {
            self.calls.lock().unwrap().push((batch.clone(), grid));
            match self.fail_with_status {
                Some(status) => Err(ForecastError::HttpStatus(status)),
                None => Ok(self.items.clone()),
            }
        }
    }

    impl FakeSource {
        fn with_items(items: Vec<RawForecastItem>) -> Self {
            Self {
                items,
                ..Default::default()
            }
        }
    }

    /// Shares the fake with the service so calls can be inspected afterwards.
    #[derive(Debug)]
    struct Shared(std::sync::Arc<FakeSource>);

    #[async_trait]
    impl ForecastSource for Shared {
        async fn fetch(
            &self,
            batch: &IssuanceBatch,
            grid: GridPoint,
        ) -> Result<Vec<RawForecastItem>, ForecastError> {
            self.0.fetch(batch, grid).await
        }
    }

    fn service(fake: FakeSource) -> (WeatherService, std::sync::Arc<FakeSource>) {
        let fake = std::sync::Arc::new(fake);
        (WeatherService::new(Box::new(Shared(fake.clone()))), fake)
    }

    fn item(category: &str, date: &str, time: &str, value: &str) -> RawForecastItem {
        RawForecastItem {
            category: category.into(),
            fcst_date: date.into(),
            fcst_time: time.into(),
            fcst_value: value.into(),
        }
    }

    fn jan_first(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid test timestamp")
    }

    #[tokio::test]
    async fn seoul_early_afternoon_scenario() {
        let (svc, fake) = service(FakeSource::with_items(vec![
            item("SKY", "20240101", "1300", "1"),
            item("TMP", "20240101", "1300", "5"),
            item("PTY", "20240101", "1300", "0"),
            item("SKY", "20240101", "1400", "3"),
            item("TMP", "20240101", "1400", "6"),
            item("PTY", "20240101", "1400", "0"),
        ]));

        let report = svc.get_weather_at("서울", jan_first(13, 0)).await.expect("report");

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            IssuanceBatch {
                date: "20240101".into(),
                time: "1100".into(),
            }
        );
        assert_eq!(calls[0].1, GridPoint { nx: 60, ny: 127 });

        assert_eq!(report.location, "서울");
        assert_eq!(report.date, "20240101");
        assert_eq!(report.time, "1100");
        assert_eq!(report.forecasts.len(), 2);

        let first = &report.forecasts[0];
        assert_eq!((first.date.as_str(), first.time.as_str()), ("01/01", "13:00"));
        let expected: BTreeMap<Category, String> = [
            (Category::Temperature, "5".to_string()),
            (Category::Sky, "맑음".to_string()),
            (Category::PrecipitationType, "없음".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(first.data, expected);

        let current = report.current.expect("current snapshot");
        assert_eq!(current.temperature, "5");
        assert_eq!(current.sky, "맑음");
        assert_eq!(current.humidity, crate::model::NO_DATA);
    }

    #[tokio::test]
    async fn unknown_location_short_circuits_before_fetch() {
        let (svc, fake) = service(FakeSource::with_items(vec![item(
            "TMP", "20240101", "1300", "5",
        )]));

        let err = svc.get_weather_at("Seoul", jan_first(13, 0)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn location_is_checked_before_api_key() {
        let svc = WeatherService::new(Box::new(KmaClient::new(None, "http://127.0.0.1:1")));

        let err = svc.get_weather_at("뉴욕", jan_first(13, 0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);

        let err = svc.get_weather_at("서울", jan_first(13, 0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn source_error_is_returned_unchanged() {
        let (svc, _) = service(FakeSource {
            fail_with_status: Some(500),
            ..Default::default()
        });

        let err = svc.get_weather_at("부산", jan_first(9, 0)).await.unwrap_err();
        assert!(matches!(err, ForecastError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn empty_item_list_is_empty_data_error() {
        let (svc, _) = service(FakeSource::with_items(Vec::new()));

        let err = svc.get_weather_at("제주", jan_first(9, 0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyData);
        assert_eq!(err.to_string(), "날씨 데이터가 없습니다.");
    }

    #[tokio::test]
    async fn all_past_items_give_empty_report_without_snapshot() {
        let (svc, _) = service(FakeSource::with_items(vec![item("TMP", "20240101", "0900", "1")]));

        let report = svc.get_weather_at("대전", jan_first(13, 0)).await.expect("report");
        assert!(report.forecasts.is_empty());
        assert!(report.current.is_none());
    }

    #[tokio::test]
    async fn call_tool_with_bad_arguments_returns_error_payload() {
        let (svc, fake) = service(FakeSource::default());

        let payload = svc.call_tool("{\"city\": \"서울\"}").await;
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        let msg = value["error"].as_str().expect("error string");
        assert!(msg.starts_with("도구 인자를 해석할 수 없습니다"));
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn call_tool_with_unknown_location_lists_regions() {
        let (svc, _) = service(FakeSource::default());

        let payload = svc.call_tool(r#"{"location": "평양"}"#).await;
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        let msg = value["error"].as_str().expect("error string");
        assert!(msg.contains("'평양'"));
        assert!(msg.contains("양천구"));
    }
}
