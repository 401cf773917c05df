pub mod constant_product;

use crate::core::{Address, SwapResult};

pub use constant_product::ConstantProductVenue;

/// Uniform interface to an AMM router venue. Venues are supplied per swap
/// call; the router holds no relationship to one beyond a single call.
#[async_trait::async_trait]
pub trait Venue: Send + Sync {
    /// Ledger identity of the venue, also the account its reserves sit on.
    fn address(&self) -> Address;

    /// Human-readable label used in logs and events.
    fn name(&self) -> &str;

    /// Amount of `token_out` this venue would deliver for `amount_in` of
    /// `token_in`. Read-only: must not mutate any balance or allowance.
    async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
    ) -> SwapResult<u128>;

    /// Exchange `amount_in` of `token_in` pulled from `payer` for at least
    /// `min_amount_out` of `token_out`, delivered to `recipient`. Returns the
    /// realized output. Fails atomically, before any funds move, when the
    /// realized output would undercut `min_amount_out`
    /// (`SwapError::SlippageExceeded`) or when `payer` has not authorized
    /// `amount_in` (`SwapError::InsufficientAllowance`).
    async fn execute(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
        min_amount_out: u128,
        payer: Address,
        recipient: Address,
    ) -> SwapResult<u128>;
}
