use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, instrument};

use super::{PlaceLoader, RawPlaceRecord, Result};

/// Downloads a JSON array of place records over HTTP.
///
/// Builds its own tokio runtime per load, so it must not be called from inside an
/// async context.
#[derive(Debug, Clone)]
pub struct UrlLoader {
    url: String,
}

impl UrlLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl PlaceLoader for UrlLoader {
    #[instrument(name = "Download places", skip_all, fields(url = %self.url), level = "info")]
    fn load(&self) -> Result<Vec<RawPlaceRecord>> {
        let rt = tokio::runtime::Runtime::new()?;
        let body = rt.block_on(async {
            let client = Client::new();
            download_to_vec(&client, &self.url).await
        })?;
        let records: Vec<RawPlaceRecord> = serde_json::from_slice(&body)?;
        info!(count = records.len(), "Downloaded raw place records");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("url:{}", self.url)
    }
}

/// Upper bound on buffer preallocation taken from `Content-Length`.
const MAX_PREALLOC: u64 = 8 << 20;

fn prealloc_len(content_length: u64) -> usize {
    usize::try_from(content_length.min(MAX_PREALLOC)).unwrap_or(0)
}

async fn download_to_vec(client: &Client, url: &str) -> Result<Vec<u8>> {
    info!(url, "Starting download");
    let response = client.get(url).send().await?.error_for_status()?;

    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    pb.set_style(ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})").expect("Progress bar template")
        .progress_chars("█░"));
    pb.set_message(format!(
        "Downloading {}",
        url.split('/').next_back().unwrap_or(url)
    ));

    let mut body = Vec::with_capacity(prealloc_len(total_size));
    let mut stream = response.bytes_stream();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        body.extend_from_slice(&chunk);
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prealloc_is_capped() {
        assert_eq!(prealloc_len(0), 0);
        assert_eq!(prealloc_len(1024), 1024);
        assert_eq!(prealloc_len(u64::MAX), 8 << 20);
    }
}
