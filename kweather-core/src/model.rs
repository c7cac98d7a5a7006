use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Placeholder for a snapshot field the first forecast slot does not carry.
pub const NO_DATA: &str = "정보 없음";

/// One `(category, timestamp)` record as returned by `getVilageFcst`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForecastItem {
    pub category: String,
    pub fcst_date: String,
    pub fcst_time: String,
    pub fcst_value: String,
}

/// Forecast categories we keep. Serialized as their Korean label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "강수확률")]
    PrecipitationProbability,
    #[serde(rename = "강수형태")]
    PrecipitationType,
    #[serde(rename = "습도")]
    Humidity,
    #[serde(rename = "하늘상태")]
    Sky,
    #[serde(rename = "기온")]
    Temperature,
    #[serde(rename = "최저기온")]
    MinTemperature,
    #[serde(rename = "최고기온")]
    MaxTemperature,
    #[serde(rename = "동서바람성분")]
    WindEastWest,
    #[serde(rename = "남북바람성분")]
    WindNorthSouth,
    #[serde(rename = "파고")]
    WaveHeight,
    #[serde(rename = "풍향")]
    WindDirection,
    #[serde(rename = "풍속")]
    WindSpeed,
}

impl Category {
    pub const fn all() -> &'static [Category] {
        &[
            Category::PrecipitationProbability,
            Category::PrecipitationType,
            Category::Humidity,
            Category::Sky,
            Category::Temperature,
            Category::MinTemperature,
            Category::MaxTemperature,
            Category::WindEastWest,
            Category::WindNorthSouth,
            Category::WaveHeight,
            Category::WindDirection,
            Category::WindSpeed,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let category = match code {
            "POP" => Category::PrecipitationProbability,
            "PTY" => Category::PrecipitationType,
            "REH" => Category::Humidity,
            "SKY" => Category::Sky,
            "TMP" => Category::Temperature,
            "TMN" => Category::MinTemperature,
            "TMX" => Category::MaxTemperature,
            "UUU" => Category::WindEastWest,
            "VVV" => Category::WindNorthSouth,
            "WAV" => Category::WaveHeight,
            "VEC" => Category::WindDirection,
            "WSD" => Category::WindSpeed,
            _ => return None,
        };
        Some(category)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Category::PrecipitationProbability => "POP",
            Category::PrecipitationType => "PTY",
            Category::Humidity => "REH",
            Category::Sky => "SKY",
            Category::Temperature => "TMP",
            Category::MinTemperature => "TMN",
            Category::MaxTemperature => "TMX",
            Category::WindEastWest => "UUU",
            Category::WindNorthSouth => "VVV",
            Category::WaveHeight => "WAV",
            Category::WindDirection => "VEC",
            Category::WindSpeed => "WSD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::PrecipitationProbability => "강수확률",
            Category::PrecipitationType => "강수형태",
            Category::Humidity => "습도",
            Category::Sky => "하늘상태",
            Category::Temperature => "기온",
            Category::MinTemperature => "최저기온",
            Category::MaxTemperature => "최고기온",
            Category::WindEastWest => "동서바람성분",
            Category::WindNorthSouth => "남북바람성분",
            Category::WaveHeight => "파고",
            Category::WindDirection => "풍향",
            Category::WindSpeed => "풍속",
        }
    }

    /// Display unit for numeric categories; coded ones have none.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Category::PrecipitationProbability | Category::Humidity => Some("%"),
            Category::Temperature | Category::MinTemperature | Category::MaxTemperature => {
                Some("℃")
            }
            Category::WindEastWest | Category::WindNorthSouth | Category::WindSpeed => Some("m/s"),
            Category::WaveHeight => Some("M"),
            Category::WindDirection => Some("deg"),
            Category::PrecipitationType | Category::Sky => None,
        }
    }
}

/// All categories observed for one forecast timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSlot {
    /// `MM/DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub data: BTreeMap<Category, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature: String,
    pub sky: String,
    pub precipitation_type: String,
    pub precipitation_probability: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl CurrentSnapshot {
    pub fn from_slot(slot: &ForecastSlot) -> Self {
        let field = |category: Category| {
            slot.data
                .get(&category)
                .cloned()
                .unwrap_or_else(|| NO_DATA.to_string())
        };

        Self {
            temperature: field(Category::Temperature),
            sky: field(Category::Sky),
            precipitation_type: field(Category::PrecipitationType),
            precipitation_probability: field(Category::PrecipitationProbability),
            humidity: field(Category::Humidity),
            wind_speed: field(Category::WindSpeed),
        }
    }
}

/// Successful answer to a weather query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    /// Batch `base_date` (YYYYMMDD).
    pub date: String,
    /// Batch `base_time` (HHMM).
    pub time: String,
    pub forecasts: Vec<ForecastSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentSnapshot>,
}

pub type WeatherResult = Result<WeatherReport, ForecastError>;

/// Shape handed to the chat agent: a report, or `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolPayload {
    Report(WeatherReport),
    Error { error: String },
}

impl From<WeatherResult> for ToolPayload {
    fn from(result: WeatherResult) -> Self {
        match result {
            Ok(report) => ToolPayload::Report(report),
            Err(err) => ToolPayload::Error {
                error: err.to_string(),
            },
        }
    }
}

impl ToolPayload {
    /// JSON text for the transcript. Hangul is written as-is, not `\u` escaped.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(r#"{{"error":"응답 직렬화에 실패했습니다: {err}"}}"#)
        })
    }
}
