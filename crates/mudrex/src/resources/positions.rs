//! Positions API endpoint

use super::{decimal_arg, path_id};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::common::{decode, decode_list, fill_missing};
use crate::types::{Position, RiskOrder};
use serde_json::{Map, Value, json};

/// Manage open positions and their stop-loss / take-profit orders.
#[derive(Debug, Clone)]
pub struct Positions {
    pipeline: RequestPipeline,
}

impl Positions {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    fn path(position_id: &str, suffix: &str) -> Result<String> {
        let position_id = path_id("position_id", position_id)?;
        Ok(format!("/futures/positions/{position_id}{suffix}"))
    }

    async fn position(&self, request: ApiRequest, position_id: &str) -> Result<Position> {
        let mut data = self.pipeline.execute(&request).await?;
        if data.is_null() {
            data = Value::Object(Map::new());
        }
        fill_missing(&mut data, "position_id", position_id.trim());
        decode(data)
    }

    /// Open positions.
    pub async fn list_open(&self) -> Result<Vec<Position>> {
        let data = self
            .pipeline
            .execute(&ApiRequest::get("/futures/positions"))
            .await?;
        decode_list(data)
    }

    /// A single position.
    pub async fn get(&self, position_id: &str) -> Result<Position> {
        let data = self
            .pipeline
            .execute(&ApiRequest::get(Self::path(position_id, "")?))
            .await?;
        decode(data)
    }

    /// Close the whole position at market.
    pub async fn close(&self, position_id: &str) -> Result<bool> {
        self.pipeline
            .execute(&ApiRequest::post(Self::path(position_id, "/close")?))
            .await?;
        Ok(true)
    }

    /// Close `quantity` of the position and return what remains.
    pub async fn close_partial(&self, position_id: &str, quantity: &str) -> Result<Position> {
        let quantity = decimal_arg("quantity", quantity)?;
        let request = ApiRequest::post(Self::path(position_id, "/close/partial")?)
            .json_value(json!({ "quantity": quantity }));
        self.position(request, position_id).await
    }

    /// Flip the position to the opposite side with the same size.
    pub async fn reverse(&self, position_id: &str) -> Result<Position> {
        let request = ApiRequest::post(Self::path(position_id, "/reverse")?);
        self.position(request, position_id).await
    }

    /// Attach stop-loss and/or take-profit orders.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] if neither price is given.
    pub async fn set_risk_order(
        &self,
        position_id: &str,
        stoploss_price: Option<&str>,
        takeprofit_price: Option<&str>,
    ) -> Result<bool> {
        let order = risk_order(position_id, stoploss_price, takeprofit_price)?;
        let request = ApiRequest::post(Self::path(position_id, "/riskorder")?).json(&order)?;
        self.pipeline.execute(&request).await?;
        Ok(true)
    }

    /// Attach a stop-loss.
    pub async fn set_stoploss(&self, position_id: &str, price: &str) -> Result<bool> {
        self.set_risk_order(position_id, Some(price), None).await
    }

    /// Attach a take-profit.
    pub async fn set_takeprofit(&self, position_id: &str, price: &str) -> Result<bool> {
        self.set_risk_order(position_id, None, Some(price)).await
    }

    /// Change existing stop-loss and/or take-profit prices.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] if neither price is given.
    pub async fn edit_risk_order(
        &self,
        position_id: &str,
        stoploss_price: Option<&str>,
        takeprofit_price: Option<&str>,
    ) -> Result<bool> {
        let order = risk_order(position_id, stoploss_price, takeprofit_price)?;
        let request = ApiRequest::patch(Self::path(position_id, "/riskorder")?).json(&order)?;
        self.pipeline.execute(&request).await?;
        Ok(true)
    }

    /// One page of closed positions.
    pub async fn history(&self, page: u32, per_page: u32) -> Result<Vec<Position>> {
        let request = ApiRequest::get("/futures/positions/history")
            .query("page", page)
            .query("per_page", per_page);

        let data = self.pipeline.execute(&request).await?;
        decode_list(data)
    }
}

fn risk_order(
    position_id: &str,
    stoploss_price: Option<&str>,
    takeprofit_price: Option<&str>,
) -> Result<RiskOrder> {
    let mut order = RiskOrder::new(position_id.trim());
    if let Some(price) = stoploss_price {
        order = order.stoploss(price);
    }
    if let Some(price) = takeprofit_price {
        order = order.takeprofit(price);
    }
    if order.is_empty() {
        return Err(Error::InvalidRequest(
            "risk order needs a stop-loss or take-profit price".to_string(),
        ));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_paths() {
        assert_eq!(
            Positions::path("p-1", "/close/partial").unwrap(),
            "/futures/positions/p-1/close/partial"
        );
        assert_matches!(Positions::path("", "/close"), Err(Error::InvalidRequest(_)));
    }

    #[test]
    fn test_risk_order_requires_a_price() {
        assert_matches!(risk_order("p-1", None, None), Err(Error::InvalidRequest(_)));
        assert_matches!(risk_order("p-1", Some(""), None), Err(Error::InvalidRequest(_)));

        let order = risk_order("p-1", None, Some("70000")).unwrap();
        assert_eq!(order.takeprofit_price.as_deref(), Some("70000"));
        assert_eq!(order.stoploss_price, None);
    }
}
