//! Leverage API endpoint

use super::{decimal_arg, path_id};
use crate::error::Result;
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::common::{decode, fill_missing};
use crate::types::{Leverage, MarginType};
use serde_json::json;

/// Read and change per-asset leverage.
#[derive(Debug, Clone)]
pub struct LeverageSettings {
    pipeline: RequestPipeline,
}

impl LeverageSettings {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Current leverage for `asset_id`.
    pub async fn get(&self, asset_id: &str) -> Result<Leverage> {
        let asset_id = path_id("asset_id", asset_id)?;
        let mut data = self
            .pipeline
            .execute(&ApiRequest::get(format!("/futures/{asset_id}/leverage")))
            .await?;

        if data.is_null() {
            data = json!({});
        }
        fill_missing(&mut data, "asset_id", asset_id.as_str());
        decode(data)
    }

    /// Set leverage and margin mode for `asset_id`.
    ///
    /// The returned value reflects what was requested; the endpoint does not
    /// always echo the new setting.
    pub async fn set(
        &self,
        asset_id: &str,
        leverage: &str,
        margin_type: MarginType,
    ) -> Result<Leverage> {
        let asset_id = path_id("asset_id", asset_id)?;
        let leverage = decimal_arg("leverage", leverage)?;
        let request = ApiRequest::post(format!("/futures/{asset_id}/leverage")).json_value(json!({
            "margin_type": margin_type,
            "leverage": leverage,
        }));

        self.pipeline.execute(&request).await?;

        Ok(Leverage {
            asset_id: asset_id.as_str().to_string(),
            leverage: leverage.to_string(),
            margin_type,
        })
    }
}
