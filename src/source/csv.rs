use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::provider::{RowKind, RowSource, SourceError};
use super::rows::RawRow;

/// Translate a CSV document into raw rows: one `RawRow` per record, keyed by
/// the header line. Empty cells are treated as absent rather than stored as
/// empty strings, so downstream presence checks stay uniform across CSV and
/// JSON loaders.
pub fn rows_from_reader<R: Read>(rdr: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.trim().is_empty() {
                continue;
            }
            row.set(header, Value::String(cell.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn rows_from_str(text: &str) -> Result<Vec<RawRow>, csv::Error> {
    rows_from_reader(text.as_bytes())
}

/// Row source backed by a local directory of CSV exports.
pub struct FileCsvSource {
    dir: PathBuf,
}

impl FileCsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> FileCsvSource {
        FileCsvSource { dir: dir.into() }
    }
}

#[async_trait]
impl RowSource for FileCsvSource {
    async fn fetch_rows(&self, kind: RowKind) -> Result<Vec<RawRow>, SourceError> {
        let path = self.dir.join(kind.file_name());
        debug!("Reading {}", path.display());
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(rows_from_str(&text)?)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Row source that pulls the CSV exports over HTTP (the published site
/// artifacts of the upstream model run).
pub struct HttpCsvSource {
    http: Client,
    base_url: String,
}

impl HttpCsvSource {
    pub fn new(base_url: &str) -> Result<HttpCsvSource> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpCsvSource {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RowSource for HttpCsvSource {
    async fn fetch_rows(&self, kind: RowKind) -> Result<Vec<RawRow>, SourceError> {
        let url = format!("{}/{}", self.base_url, kind.file_name());
        debug!("Fetching {}", url);

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(rows_from_str(&body)?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
datetime_gmt8,league,home_name,away_name,has_recommendation,rec_text,rec_odds
2025-09-14 21:00:00,England Premier League,Burnley,Liverpool,True,Liverpool -1.5,1.925
2025-09-15 18:00:00,Japan J1 League,Tokyo,Tokyo Verdy,False,,
";

    #[test]
    fn test_rows_from_str() {
        let rows = rows_from_str(SAMPLE).expect("sample should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].text(&["home_name"]),
            Some("Burnley".to_string())
        );
        assert_eq!(rows[0].number(&["rec_odds"]), Some(1.925));
        assert_eq!(rows[0].flag(&["has_recommendation"]), Some(true));
    }

    #[test]
    fn test_empty_cells_are_absent() {
        let rows = rows_from_str(SAMPLE).expect("sample should parse");
        assert_eq!(rows[1].text(&["rec_text"]), None);
        assert_eq!(rows[1].number(&["rec_odds"]), None);
    }

    #[test]
    fn test_short_records_tolerated() {
        let rows = rows_from_str("a,b,c\n1,2\n").expect("flexible reader");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number(&["b"]), Some(2.0));
        assert_eq!(rows[0].text(&["c"]), None);
    }

    #[test]
    fn test_header_only_is_empty() {
        let rows = rows_from_str("a,b,c\n").expect("header only");
        assert!(rows.is_empty());
    }
}
