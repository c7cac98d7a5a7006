use std::fmt::Write;

use kweather_core::{Category, NO_DATA, WeatherReport};

/// Value with its unit, unless it is the no-data placeholder.
fn with_unit(value: &str, category: Category) -> String {
    match category.unit() {
        Some(unit) if value != NO_DATA => format!("{value}{unit}"),
        _ => value.to_string(),
    }
}

/// Render a report as a short human-readable summary.
pub fn format_report(report: &WeatherReport) -> String {
    let mut out = format!(
        "{} 날씨 (발표 {} {})\n",
        report.location, report.date, report.time
    );

    let Some(current) = &report.current else {
        out.push_str("현재 이후의 예보가 없습니다.\n");
        return out;
    };

    let _ = writeln!(
        out,
        "현재: {}, 기온 {}, 강수 {} (확률 {}), 습도 {}, 풍속 {}",
        current.sky,
        with_unit(&current.temperature, Category::Temperature),
        current.precipitation_type,
        with_unit(&current.precipitation_probability, Category::PrecipitationProbability),
        with_unit(&current.humidity, Category::Humidity),
        with_unit(&current.wind_speed, Category::WindSpeed),
    );

    out.push_str("\n시간별 예보:\n");
    for slot in &report.forecasts {
        let fields: Vec<String> = slot
            .data
            .iter()
            .map(|(category, value)| {
                format!("{} {}", category.label(), with_unit(value, *category))
            })
            .collect();
        let _ = writeln!(out, "  {} {}  {}", slot.date, slot.time, fields.join(" | "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kweather_core::{CurrentSnapshot, ForecastSlot};

    fn report() -> WeatherReport {
        let slot = ForecastSlot {
            date: "01/01".into(),
            time: "13:00".into(),
            data: [
                (Category::Temperature, "5".to_string()),
                (Category::Sky, "맑음".to_string()),
            ]
            .into_iter()
            .collect(),
        };
        let current = CurrentSnapshot::from_slot(&slot);

        WeatherReport {
            location: "서울".into(),
            date: "20240101".into(),
            time: "1100".into(),
            forecasts: vec![slot],
            current: Some(current),
        }
    }

    #[test]
    fn summary_shows_units_and_placeholders() {
        let text = format_report(&report());

        assert!(text.starts_with("서울 날씨 (발표 20240101 1100)\n"));
        assert!(text.contains("현재: 맑음, 기온 5℃"));
        assert!(text.contains(&format!("풍속 {NO_DATA}")));
        assert!(text.contains("  01/01 13:00  하늘상태 맑음 | 기온 5℃"));
    }

    #[test]
    fn report_without_snapshot_says_so() {
        let mut r = report();
        r.forecasts.clear();
        r.current = None;

        let text = format_report(&r);
        assert!(text.ends_with("현재 이후의 예보가 없습니다.\n"));
    }
}
