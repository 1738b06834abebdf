//! Read-only tour of the API: balances, assets, leverage and open positions.
//!
//! ```sh
//! MUDREX_API_SECRET=... RUST_LOG=mudrex=debug cargo run --example quickstart --features trace
//! ```

use mudrex::{Client, ListParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mudrex::observability::init_tracing();

    let client = Client::from_env()?;

    let spot = client.wallet().spot_balance().await?;
    println!("Spot: {} {} available of {}", spot.available, spot.currency, spot.total);

    let futures = client.wallet().futures_balance().await?;
    println!(
        "Futures: {} {} (unrealized PnL {})",
        futures.balance, futures.currency, futures.unrealized_pnl
    );

    let assets = client.assets().list(ListParams::page(1, 5)).await?;
    for asset in &assets {
        println!(
            "{:<12} leverage {}-{}x, min qty {}",
            asset.symbol, asset.min_leverage, asset.max_leverage, asset.min_quantity
        );
    }

    if let Some(asset) = assets.first() {
        let leverage = client.leverage().get(&asset.asset_id).await?;
        println!("{} leverage: {}x {}", asset.symbol, leverage.leverage, leverage.margin_type);
    }

    for position in client.positions().list_open().await? {
        println!(
            "{} {} {} @ {} ({:+.2}%)",
            position.symbol,
            position.side,
            position.quantity,
            position.entry_price,
            position.pnl_percentage()
        );
    }

    if let Some(usage) = client.rate_limit_usage() {
        for window in usage {
            println!("{}: {}/{}", window.window, window.count, window.ceiling);
        }
    }

    Ok(())
}
