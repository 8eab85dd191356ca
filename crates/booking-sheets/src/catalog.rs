//! Price Catalog Feed
//!
//! The catalog is a published spreadsheet CSV. Column positions are fixed
//! by the sheet layout: course name in column 0, location in column 4,
//! price in column 5, with a header row first. A lookup scans for the
//! first row matching both course and location.

use async_trait::async_trait;

use crate::error::{Result, SheetsError};

/// Column positions in the published sheet.
const COL_COURSE: usize = 0;
const COL_LOCATION: usize = 4;
const COL_PRICE: usize = 5;

/// One row of the price catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogRow {
    pub course: String,
    pub location: String,
    /// Decimal price string exactly as published (e.g. `"150.00"`)
    pub price: String,
}

/// Price catalog lookup (trait seam so handlers can run against an
/// in-memory catalog in tests).
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// Find the price row for a course at a location.
    ///
    /// Returns [`SheetsError::PriceNotFound`] when no row matches.
    async fn price_for(&self, course: &str, location: &str) -> Result<CatalogRow>;
}

/// Catalog backed by an HTTP CSV feed, fetched fresh on every lookup.
pub struct HttpPriceCatalog {
    client: reqwest::Client,
    feed_url: String,
}

impl HttpPriceCatalog {
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl PriceCatalog for HttpPriceCatalog {
    async fn price_for(&self, course: &str, location: &str) -> Result<CatalogRow> {
        let response = self.client.get(&self.feed_url).send().await?;
        if !response.status().is_success() {
            return Err(SheetsError::Status(response.status()));
        }
        let body = response.text().await?;
        find_price(&body, course, location)
    }
}

/// Scan the CSV text for the first row matching both course and location.
///
/// Quoted fields (including commas inside quotes) are handled by the CSV
/// reader. Rows too short to carry the expected columns are skipped.
fn find_price(csv_text: &str, course: &str, location: &str) -> Result<CatalogRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let (Some(row_course), Some(row_location), Some(row_price)) = (
            record.get(COL_COURSE),
            record.get(COL_LOCATION),
            record.get(COL_PRICE),
        ) else {
            tracing::debug!(row = index + 1, "skipping short catalog row");
            continue;
        };

        if row_course == course && row_location == location {
            return Ok(CatalogRow {
                course: row_course.to_string(),
                location: row_location.to_string(),
                price: row_price.to_string(),
            });
        }
    }

    Err(SheetsError::PriceNotFound {
        course: course.to_string(),
        location: location.to_string(),
    })
}

/// In-memory catalog for tests and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    rows: Vec<CatalogRow>,
}

impl MemoryCatalog {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl PriceCatalog for MemoryCatalog {
    async fn price_for(&self, course: &str, location: &str) -> Result<CatalogRow> {
        self.rows
            .iter()
            .find(|row| row.course == course && row.location == location)
            .cloned()
            .ok_or_else(|| SheetsError::PriceNotFound {
                course: course.to_string(),
                location: location.to_string(),
            })
    }
}
