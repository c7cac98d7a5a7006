use serde::Serialize;

use crate::error::ForecastError;

/// A region the forecast grid lookup knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLocation {
    pub name: &'static str,
    pub grid_x: u16,
    pub grid_y: u16,
}

impl SupportedLocation {
    const fn new(name: &'static str, grid_x: u16, grid_y: u16) -> Self {
        Self {
            name,
            grid_x,
            grid_y,
        }
    }

    pub fn grid(&self) -> GridPoint {
        GridPoint {
            nx: self.grid_x,
            ny: self.grid_y,
        }
    }
}

/// KMA forecast grid cell (`nx`, `ny`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub nx: u16,
    pub ny: u16,
}

/// Province/metro regions followed by Seoul districts.
pub static REGIONS: &[SupportedLocation] = &[
    SupportedLocation::new("서울", 60, 127),
    SupportedLocation::new("인천", 55, 124),
    SupportedLocation::new("부산", 98, 76),
    SupportedLocation::new("대구", 89, 90),
    SupportedLocation::new("광주", 58, 74),
    SupportedLocation::new("대전", 67, 100),
    SupportedLocation::new("울산", 102, 84),
    SupportedLocation::new("세종", 66, 103),
    SupportedLocation::new("경기", 60, 120),
    SupportedLocation::new("강원", 73, 134),
    SupportedLocation::new("충북", 69, 107),
    SupportedLocation::new("충남", 68, 100),
    SupportedLocation::new("전북", 63, 89),
    SupportedLocation::new("전남", 51, 67),
    SupportedLocation::new("경북", 89, 91),
    SupportedLocation::new("경남", 91, 77),
    SupportedLocation::new("제주", 52, 38),
    SupportedLocation::new("구로구", 58, 125),
    SupportedLocation::new("은평구", 59, 127),
    SupportedLocation::new("양천구", 58, 126),
];

/// Comma-separated list of every supported name, in table order.
pub fn supported_names() -> String {
    REGIONS.iter().map(|r| r.name).collect::<Vec<_>>().join(", ")
}

/// Exact-match lookup. No trimming or case folding is applied.
pub fn resolve(name: &str) -> Result<&'static SupportedLocation, ForecastError> {
    REGIONS
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| ForecastError::UnknownLocation {
            location: name.to_string(),
            supported: supported_names(),
        })
}
