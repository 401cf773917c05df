pub mod memory;

use crate::core::{Address, SwapResult};

pub use memory::InMemoryLedger;

/// Fungible-token ledger the router and venues settle against. Mirrors the
/// standard transfer/approve/balance surface of an external token contract;
/// owners and spenders are passed explicitly since there is no ambient call
/// context to derive them from.
///
/// Every operation is atomic within itself: when it returns an error, no
/// balance or allowance has changed.
#[async_trait::async_trait]
pub trait TokenLedger: Send + Sync {
    async fn balance_of(&self, token: Address, owner: Address) -> SwapResult<u128>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SwapResult<u128>;

    /// Set the absolute allowance `owner` grants `spender` for `token`.
    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> SwapResult<()>;

    async fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> SwapResult<()>;

    /// Move `amount` of `owner`'s `token` to `to`, spending `spender`'s
    /// allowance. The allowance is consumed by the amount moved.
    async fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> SwapResult<()>;
}
