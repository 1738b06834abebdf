//! Wallet API endpoint

use super::decimal_arg;
use crate::error::Result;
use crate::http::{ApiRequest, RequestPipeline};
use crate::types::common::{decode, decode_or_empty};
use crate::types::wallet::TransferReceipt;
use crate::types::{FuturesBalance, TransferResult, WalletBalance, WalletType};
use serde_json::json;

/// Wallet balances and transfers between the spot and futures wallets.
#[derive(Debug, Clone)]
pub struct Wallet {
    pipeline: RequestPipeline,
}

impl Wallet {
    pub(crate) fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Spot wallet balance.
    pub async fn spot_balance(&self) -> Result<WalletBalance> {
        let data = self.pipeline.execute(&ApiRequest::get("/wallet/funds")).await?;
        decode(data)
    }

    /// Futures wallet balance.
    pub async fn futures_balance(&self) -> Result<FuturesBalance> {
        let data = self.pipeline.execute(&ApiRequest::post("/futures/funds")).await?;
        decode(data)
    }

    /// Move `amount` from the spot wallet to the futures wallet.
    pub async fn transfer_to_futures(&self, amount: &str) -> Result<TransferResult> {
        self.transfer(WalletType::Spot, WalletType::Futures, amount).await
    }

    /// Move `amount` from the futures wallet back to the spot wallet.
    pub async fn transfer_to_spot(&self, amount: &str) -> Result<TransferResult> {
        self.transfer(WalletType::Futures, WalletType::Spot, amount).await
    }

    async fn transfer(
        &self,
        from: WalletType,
        to: WalletType,
        amount: &str,
    ) -> Result<TransferResult> {
        let amount = decimal_arg("amount", amount)?;
        let request = ApiRequest::post("/wallet/futures/transfer").json_value(json!({
            "from_wallet_type": from,
            "to_wallet_type": to,
            "amount": amount,
        }));

        let data = self.pipeline.execute(&request).await?;
        let receipt: TransferReceipt = decode_or_empty(data)?;

        Ok(TransferResult {
            success: true,
            from_wallet: from,
            to_wallet: to,
            amount: amount.to_string(),
            transaction_id: receipt.transaction_id,
        })
    }
}
