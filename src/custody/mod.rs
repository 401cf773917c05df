use crate::core::{Address, SwapError, SwapResult};
use crate::ledger::TokenLedger;
use log::debug;
use std::sync::Arc;

/// Moves funds in and out of router custody and manages the allowances
/// venues need to pull from it.
pub struct CustodyManager {
    ledger: Arc<dyn TokenLedger>,
    router: Address,
}

impl CustodyManager {
    pub fn new(ledger: Arc<dyn TokenLedger>, router: Address) -> Self {
        Self { ledger, router }
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// Pull `amount` of `token` from `from` into router custody.
    ///
    /// Balance and allowance shortfalls are surfaced as `TransferFailed`
    /// before the transfer is attempted, so a doomed swap fails before any
    /// venue is contacted.
    pub async fn pull_in(&self, token: Address, from: Address, amount: u128) -> SwapResult<()> {
        let balance = self.ledger.balance_of(token, from).await?;
        if balance < amount {
            return Err(SwapError::TransferFailed {
                token,
                reason: format!("caller balance {} below required {}", balance, amount),
            });
        }

        let granted = self.ledger.allowance(token, from, self.router).await?;
        if granted < amount {
            return Err(SwapError::TransferFailed {
                token,
                reason: format!(
                    "caller allowance to router {} below required {}",
                    granted, amount
                ),
            });
        }

        self.ledger
            .transfer_from(token, self.router, from, self.router, amount)
            .await?;
        debug!("pulled {} of {} from {} into custody", amount, token, from);
        Ok(())
    }

    /// Raise the router's allowance to `venue` to at least `amount`.
    /// Idempotent: when the current allowance already suffices no
    /// state-changing call is made.
    pub async fn ensure_allowance(
        &self,
        token: Address,
        venue: Address,
        amount: u128,
    ) -> SwapResult<()> {
        let current = self.ledger.allowance(token, self.router, venue).await?;
        if current >= amount {
            debug!(
                "allowance to venue {} already sufficient: {} >= {}",
                venue, current, amount
            );
            return Ok(());
        }

        self.ledger
            .approve(token, self.router, venue, amount)
            .await?;
        debug!("raised allowance to venue {}: {} -> {}", venue, current, amount);
        Ok(())
    }

    /// Deliver `amount` of `token` from router custody to `recipient`. Last
    /// effect of a successful swap; also used to refund a failed one.
    pub async fn forward_out(
        &self,
        token: Address,
        amount: u128,
        recipient: Address,
    ) -> SwapResult<()> {
        self.ledger
            .transfer(token, self.router, recipient, amount)
            .await?;
        debug!("forwarded {} of {} to {}", amount, token, recipient);
        Ok(())
    }
}
