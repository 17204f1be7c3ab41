//! `ArcGIS` `FeatureServer` / `MapServer` fetcher.
//!
//! Queries a layer's REST `query` endpoint with `f=geojson` so every page
//! comes back as a standard `GeoJSON` `FeatureCollection`. Handles
//! pagination via `resultOffset` for services with transfer limits.

use std::sync::Arc;

use land_map_source_models::FeatureService;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// Asks the layer for its record count using `returnCountOnly=true`.
/// Returns `None` if the count request fails (non-fatal).
async fn query_count<F>(client: &reqwest::Client, service: &FeatureService<F>) -> Option<u64> {
    let response = client
        .get(service.query_url())
        .query(&[
            ("where", service.where_clause.as_str()),
            ("returnCountOnly", "true"),
            ("f", "json"),
        ])
        .send()
        .await
        .ok()?;
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("count")?.as_u64()
}

/// Fetches every feature from one layer.
///
/// Pages until the server stops setting `exceededTransferLimit`.
///
/// # Errors
///
/// Returns [`SourceError`] if a request fails, the server answers with a
/// non-success status or an `error` object, or a page has no `features`
/// array.
pub async fn fetch_features<F>(
    client: &reqwest::Client,
    service: &FeatureService<F>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<serde_json::Value>, SourceError> {
    let query_url = service.query_url();
    let out_fields = service.out_fields_param();
    let page_size = service.page_size();

    if let Some(total) = query_count(client, service).await {
        log::info!("{query_url}: {total} records available");
        progress.set_total(total);
    }

    let mut all_features: Vec<serde_json::Value> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        log::debug!("{query_url}: offset={offset}, limit={page_size}");

        let resp = client
            .get(&query_url)
            .query(&[
                ("where", service.where_clause.as_str()),
                ("outFields", out_fields.as_str()),
                ("f", "geojson"),
                ("returnGeometry", "true"),
            ])
            .query(&[("resultRecordCount", u64::from(page_size)), ("resultOffset", offset)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Conversion {
                message: format!("ArcGIS request failed with status {}", resp.status()),
            });
        }
        let body = resp.text().await?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SourceError::Conversion {
                message: format!("Failed to parse ArcGIS response: {e}"),
            })?;

        match absorb_page(&json, offset, &mut all_features, &**progress)? {
            Some(next) => offset = next,
            None => break,
        }
    }

    log::info!(
        "{query_url}: download complete, {} features",
        all_features.len()
    );
    progress.finish(format!("{} features", all_features.len()));

    Ok(all_features)
}

/// Appends one response page to `all_features` and reports it to
/// `progress`.
///
/// Returns the offset of the next page, or `None` when this page was
/// empty or the server reports no more records.
fn absorb_page(
    json: &serde_json::Value,
    offset: u64,
    all_features: &mut Vec<serde_json::Value>,
    progress: &dyn ProgressCallback,
) -> Result<Option<u64>, SourceError> {
    let features = page_features(json)?;
    if features.is_empty() {
        return Ok(None);
    }

    let count = features.len() as u64;
    all_features.extend(features.iter().cloned());
    progress.inc(count);

    Ok(exceeded_transfer_limit(json).then_some(offset + count))
}

/// Extracts the `features` array from one response page, surfacing any
/// `ArcGIS` API error object.
fn page_features(json: &serde_json::Value) -> Result<&Vec<serde_json::Value>, SourceError> {
    if let Some(error) = json.get("error") {
        return Err(SourceError::Conversion {
            message: format!(
                "ArcGIS API error: {}",
                error["message"].as_str().unwrap_or("unknown error")
            ),
        });
    }

    json["features"]
        .as_array()
        .ok_or_else(|| SourceError::Conversion {
            message: "No features array in ArcGIS response".to_string(),
        })
}

/// `ArcGIS` sets `exceededTransferLimit: true` when more records exist
/// beyond this page. It may sit at the top level or under `properties`
/// in `GeoJSON` output.
fn exceeded_transfer_limit(json: &serde_json::Value) -> bool {
    json.get("exceededTransferLimit")
        .or_else(|| json.get("properties")?.get("exceededTransferLimit"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}
