//! Place a small limit order with a stop-loss, inspect it, then cancel it.
//!
//! ```sh
//! MUDREX_API_SECRET=... cargo run --example place_order --features trace -- BTCUSDT 0.001 50000
//! ```

use anyhow::Context;
use mudrex::{Client, ErrorKind, OrderRequest, OrderType, TriggerType};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mudrex::observability::init_tracing();

    let mut args = std::env::args().skip(1);
    let asset_id = args.next().unwrap_or_else(|| "BTCUSDT".to_string());
    let quantity = args.next().unwrap_or_else(|| "0.001".to_string());
    let price = args.next().context("usage: place_order <asset> <quantity> <price>")?;

    let client = Client::from_env()?;

    let request = OrderRequest::builder()
        .quantity(quantity)
        .order_type(OrderType::Long)
        .trigger_type(TriggerType::Limit)
        .order_price(price.clone())
        .leverage("2")
        .build()?;
    let request = match stop_below(&price) {
        Some(stop) => request.with_stoploss(stop),
        None => request,
    };

    let order = match client.orders().create(&asset_id, request).await {
        Ok(order) => order,
        Err(e) if e.kind() == ErrorKind::InsufficientBalance => {
            eprintln!("Not enough margin: {e}");
            return Ok(());
        }
        Err(e) => return Err(e).context("placing order"),
    };
    println!("Placed {} ({})", order.order_id, order.status);

    let order = client.orders().get(&order.order_id).await?;
    println!("Filled {}/{} at {}", order.filled_quantity, order.quantity, order.price);

    if order.status.is_active() && client.orders().cancel(&order.order_id).await? {
        println!("Cancelled {}", order.order_id);
    }

    Ok(())
}

/// Stop-loss 5% under the entry price.
fn stop_below(price: &str) -> Option<String> {
    let price: f64 = price.parse().ok()?;
    Some(format!("{:.2}", price * 0.95))
}
