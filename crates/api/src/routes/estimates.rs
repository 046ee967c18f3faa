//! Estimate Routes

use axum::{extract::State, Json};
use feature_encoder::ProfileBatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use weight_store::Property;

use crate::error::ApiError;
use crate::AppState;

/// Request body: a columnar batch plus an optional property filter
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub batch: ProfileBatch,
    /// Properties to estimate, defaults to every loaded property
    #[serde(default)]
    pub properties: Option<Vec<Property>>,
}

/// Estimates per property, NaN serialized as `null`
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub count: usize,
    pub estimates: BTreeMap<Property, Vec<f64>>,
}

/// Estimate properties for a batch of samples
pub async fn post_estimates(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let samples = request.batch.into_samples()?;
    let properties = request
        .properties
        .unwrap_or_else(|| state.predictors.properties());
    let count = samples.len();
    debug!("Estimating {:?} for {} samples", properties, count);

    let predictors = Arc::clone(&state.predictors);
    let estimates = tokio::task::spawn_blocking(move || {
        properties
            .iter()
            .map(|&p| Ok((p, predictors.predict(p, &samples)?)))
            .collect::<Result<BTreeMap<_, _>, ApiError>>()
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(EstimateResponse { count, estimates }))
}
