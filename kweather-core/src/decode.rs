use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::model::{Category, CurrentSnapshot, ForecastSlot, RawForecastItem};

/// Maximum number of hourly slots kept in a report.
pub const MAX_SLOTS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedForecast {
    pub forecasts: Vec<ForecastSlot>,
    pub current: Option<CurrentSnapshot>,
}

/// Precipitation type (`PTY`) code to label; unknown codes pass through.
pub fn precipitation_label(code: &str) -> &str {
    match code {
        "0" => "없음",
        "1" => "비",
        "2" => "비/눈",
        "3" => "눈",
        "4" => "소나기",
        other => other,
    }
}

/// Sky condition (`SKY`) code to label; unknown codes pass through.
pub fn sky_label(code: &str) -> &str {
    match code {
        "1" => "맑음",
        "3" => "구름많음",
        "4" => "흐림",
        other => other,
    }
}

fn decode_value(category: Category, raw: &str) -> String {
    match category {
        Category::PrecipitationType => precipitation_label(raw),
        Category::Sky => sky_label(raw),
        _ => raw,
    }
    .to_string()
}

/// Reshape raw grid records into at most [`MAX_SLOTS`] chronological slots.
///
/// Records dated after `batch_date` are always kept; records on `batch_date`
/// are kept from `now`'s HH:MM onward. Dates and times are fixed-width digit
/// strings, so string order is chronological order.
pub fn decode(items: &[RawForecastItem], now: NaiveDateTime, batch_date: &str) -> DecodedForecast {
    let current_time = now.format("%H%M").to_string();

    let mut slots: BTreeMap<(&str, &str), BTreeMap<Category, String>> = BTreeMap::new();

    for item in items {
        let date = item.fcst_date.as_str();
        let time = item.fcst_time.as_str();

        let upcoming = date > batch_date || (date == batch_date && time >= current_time.as_str());
        if !upcoming {
            continue;
        }

        let Some(category) = Category::from_code(&item.category) else {
            continue;
        };

        slots
            .entry((date, time))
            .or_default()
            .insert(category, decode_value(category, &item.fcst_value));
    }

    let forecasts: Vec<ForecastSlot> = slots
        .into_iter()
        .take(MAX_SLOTS)
        .map(|((date, time), data)| ForecastSlot {
            date: format_date(date),
            time: format_time(time),
            data,
        })
        .collect();

    let current = forecasts.first().map(CurrentSnapshot::from_slot);

    DecodedForecast { forecasts, current }
}

/// `YYYYMMDD` -> `MM/DD`
fn format_date(date: &str) -> String {
    match (date.get(4..6), date.get(6..)) {
        (Some(month), Some(day)) => format!("{month}/{day}"),
        _ => date.to_string(),
    }
}

/// `HHMM` -> `HH:MM`
fn format_time(time: &str) -> String {
    match (time.get(..2), time.get(2..)) {
        (Some(hour), Some(minute)) => format!("{hour}:{minute}"),
        _ => time.to_string(),
    }
}
