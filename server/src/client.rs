//! HTTP client for the sort routes, plus the startup self-test and batch generator used by the
//! `psort-client` binary.

use crate::{
    processing::{Batch, Strategy},
    wire::{SortRequest, SortResponse},
};

#[derive(Clone)]
pub struct SortClient {
    base_url: String,
    http: reqwest::Client,
}

impl SortClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `batch` to the route serving `strategy`.
    pub async fn sort(&self, strategy: Strategy, batch: &Batch) -> anyhow::Result<SortResponse> {
        let url = format!("{}{}", self.base_url, strategy.route());
        let resp = self
            .http
            .post(url)
            .json(&SortRequest {
                to_sort: batch.clone(),
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} failed (status {status}): {}", strategy.route(), body.trim());
        }

        Ok(resp.json().await?)
    }
}

fn self_test_batch() -> Batch {
    vec![vec![3, 1, 2], vec![6, 4, 5], vec![9, 7, 8]]
}

/// Send the fixed sample batch to `/process-single` and check the answer.
pub async fn run_self_test(client: &SortClient) -> anyhow::Result<SortResponse> {
    let resp = client.sort(Strategy::Sequential, &self_test_batch()).await?;
    tracing::info!(
        event = "self_test",
        base_url = %client.base_url(),
        sorted_arrays = ?resp.sorted_arrays,
        time_ns = resp.time_ns,
        "self-test response"
    );

    let expected = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
    if resp.sorted_arrays != expected {
        anyhow::bail!(
            "self-test returned {:?}, expected {:?}",
            resp.sorted_arrays,
            expected
        );
    }
    Ok(resp)
}

/// Deterministic pseudo-random batch of `arrays` arrays with `len` values each.
///
/// Values are spread over a range small enough to produce duplicates and include negatives.
pub fn generate_batch(arrays: usize, len: usize, seed: u64) -> Batch {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 20_001) as i64 - 10_000
    };

    (0..arrays)
        .map(|_| (0..len).map(|_| next()).collect())
        .collect()
}
