//! Fees API endpoint

use crate::error::Result;
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::FeeRecord;
use crate::types::common::decode_list;

/// Trading fee history.
#[derive(Debug, Clone)]
pub struct Fees {
    pipeline: RequestPipeline,
}

impl Fees {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// One page of fee records.
    pub async fn history(&self, page: u32, per_page: u32) -> Result<Vec<FeeRecord>> {
        let request = ApiRequest::get("/futures/fee/history")
            .query("page", page)
            .query("per_page", per_page);

        let data = self.pipeline.execute(&request).await?;
        decode_list(data)
    }
}
