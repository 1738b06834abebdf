//! Orders API endpoint

use super::{decimal_arg, path_id};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::common::{decode, decode_list, fill_missing};
use crate::types::{Order, OrderRequest, OrderType, TriggerType};
use serde_json::{Map, Value};

/// Place, inspect, amend and cancel orders.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example(client: mudrex::Client) -> mudrex::Result<()> {
/// use mudrex::{OrderRequest, OrderType};
///
/// let request = OrderRequest::market(OrderType::Long, "0.001", "10")
///     .with_stoploss("58000")
///     .with_takeprofit("72000");
/// let order = client.orders().create("BTCUSDT", request).await?;
///
/// client.orders().cancel(&order.order_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Orders {
    pipeline: RequestPipeline,
}

impl Orders {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Place a market order.
    pub async fn create_market(
        &self,
        asset_id: &str,
        side: OrderType,
        quantity: &str,
        leverage: &str,
    ) -> Result<Order> {
        self.create(asset_id, OrderRequest::market(side, quantity, leverage))
            .await
    }

    /// Place a limit order at `price`.
    pub async fn create_limit(
        &self,
        asset_id: &str,
        side: OrderType,
        quantity: &str,
        price: &str,
        leverage: &str,
    ) -> Result<Order> {
        self.create(asset_id, OrderRequest::limit(side, quantity, price, leverage))
            .await
    }

    /// Place an order described by `request`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for an empty quantity or a limit order
    /// without a price; nothing is sent in that case.
    pub async fn create(&self, asset_id: &str, request: OrderRequest) -> Result<Order> {
        let asset_id = path_id("asset_id", asset_id)?;
        decimal_arg("quantity", &request.quantity)?;
        if request.trigger_type == TriggerType::Limit {
            decimal_arg("order_price", request.order_price.as_deref().unwrap_or_default())?;
        }

        let api_request = ApiRequest::post(format!("/futures/{asset_id}/order")).json(&request)?;
        let mut data = self.pipeline.execute(&api_request).await?;

        if data.is_null() {
            data = Value::Object(Map::new());
        }
        fill_missing(&mut data, "asset_id", asset_id.as_str());
        fill_missing(&mut data, "symbol", asset_id.as_str());
        decode(data)
    }

    /// Orders that are still open.
    pub async fn list_open(&self) -> Result<Vec<Order>> {
        let data = self
            .pipeline
            .execute(&ApiRequest::get("/futures/orders"))
            .await?;
        decode_list(data)
    }

    /// A single order.
    pub async fn get(&self, order_id: &str) -> Result<Order> {
        let order_id = path_id("order_id", order_id)?;
        let data = self
            .pipeline
            .execute(&ApiRequest::get(format!("/futures/orders/{order_id}")))
            .await?;
        decode(data)
    }

    /// One page of historical orders.
    pub async fn history(&self, page: u32, per_page: u32) -> Result<Vec<Order>> {
        let request = ApiRequest::get("/futures/orders/history")
            .query("page", page)
            .query("per_page", per_page);

        let data = self.pipeline.execute(&request).await?;
        decode_list(data)
    }

    /// Cancel an open order. Returns `true` once the exchange accepts the
    /// cancellation.
    pub async fn cancel(&self, order_id: &str) -> Result<bool> {
        let order_id = path_id("order_id", order_id)?;
        self.pipeline
            .execute(&ApiRequest::delete(format!("/futures/orders/{order_id}")))
            .await?;
        Ok(true)
    }

    /// Change the price and/or quantity of an open order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] if neither `price` nor `quantity` is given.
    pub async fn amend(
        &self,
        order_id: &str,
        price: Option<&str>,
        quantity: Option<&str>,
    ) -> Result<Order> {
        let order_id = path_id("order_id", order_id)?;

        let mut body = Map::new();
        if let Some(price) = price {
            body.insert("order_price".into(), decimal_arg("price", price)?.into());
        }
        if let Some(quantity) = quantity {
            body.insert("quantity".into(), decimal_arg("quantity", quantity)?.into());
        }
        if body.is_empty() {
            return Err(Error::InvalidRequest(
                "amend needs a price or a quantity".to_string(),
            ));
        }

        let request = ApiRequest::patch(format!("/futures/orders/{order_id}"))
            .json_value(Value::Object(body));
        let mut data = self.pipeline.execute(&request).await?;

        if data.is_null() {
            data = Value::Object(Map::new());
        }
        fill_missing(&mut data, "order_id", order_id.as_str());
        decode(data)
    }
}
