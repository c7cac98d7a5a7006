use async_trait::async_trait;
use std::fmt::Debug;

use crate::{batch::IssuanceBatch, error::ForecastError, model::RawForecastItem, region::GridPoint};

pub mod kma;

pub use kma::KmaClient;

/// Anything that can return the raw grid records of one issuance batch.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(
        &self,
        batch: &IssuanceBatch,
        grid: GridPoint,
    ) -> Result<Vec<RawForecastItem>, ForecastError>;
}
