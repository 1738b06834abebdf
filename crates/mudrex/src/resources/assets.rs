//! Assets API endpoint

use super::path_id;
use crate::error::Result;
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::common::{decode, decode_list, decode_page};
use crate::types::{Asset, ListParams, Page};

/// Page size used by [`Assets::search`].
const SEARCH_PAGE_SIZE: u32 = 100;

/// Discover tradable futures contracts.
#[derive(Debug, Clone)]
pub struct Assets {
    pipeline: RequestPipeline,
}

impl Assets {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    fn list_request(params: &ListParams) -> ApiRequest {
        let request = ApiRequest::get("/futures")
            .query("page", params.page)
            .query("per_page", params.per_page);

        match &params.sort_by {
            Some(field) => request
                .query("sort_by", field)
                .query("sort_order", params.sort_order.as_str()),
            None => request,
        }
    }

    /// List one page of assets.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(client: mudrex::Client) -> mudrex::Result<()> {
    /// use mudrex::{ListParams, SortOrder};
    ///
    /// let assets = client
    ///     .assets()
    ///     .list(ListParams::page(1, 20).sorted_by("symbol", SortOrder::Desc))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, params: ListParams) -> Result<Vec<Asset>> {
        let data = self.pipeline.execute(&Self::list_request(&params)).await?;
        decode_list(data)
    }

    /// List one page of assets with pagination metadata.
    pub async fn list_paginated(&self, params: ListParams) -> Result<Page<Asset>> {
        let data = self.pipeline.execute(&Self::list_request(&params)).await?;
        decode_page(data)
    }

    /// Details of a single asset.
    pub async fn get(&self, asset_id: &str) -> Result<Asset> {
        let asset_id = path_id("asset_id", asset_id)?;
        let data = self
            .pipeline
            .execute(&ApiRequest::get(format!("/futures/{asset_id}")))
            .await?;
        decode(data)
    }

    /// Assets whose symbol contains `query`, ignoring case.
    ///
    /// Filters the first 100 assets client-side.
    pub async fn search(&self, query: &str) -> Result<Vec<Asset>> {
        let needle = query.trim().to_uppercase();
        let assets = self.list(ListParams::page(1, SEARCH_PAGE_SIZE)).await?;

        Ok(assets
            .into_iter()
            .filter(|asset| asset.symbol.to_uppercase().contains(&needle))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;
    use pretty_assertions::assert_eq;

    fn pairs(request: &ApiRequest) -> Vec<(&str, &str)> {
        request
            .query_pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_sort_params_only_with_sort_by() {
        let plain = Assets::list_request(&ListParams::default());
        assert_eq!(pairs(&plain), vec![("page", "1"), ("per_page", "50")]);

        let sorted = Assets::list_request(
            &ListParams::page(2, 10).sorted_by("symbol", SortOrder::Desc),
        );
        assert_eq!(
            pairs(&sorted),
            vec![
                ("page", "2"),
                ("per_page", "10"),
                ("sort_by", "symbol"),
                ("sort_order", "desc")
            ]
        );
    }
}
