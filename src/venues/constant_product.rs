use crate::core::{constants::BPS_DENOMINATOR, Address, SwapError, SwapResult};
use crate::ledger::TokenLedger;
use crate::venues::Venue;
use log::debug;
use std::sync::Arc;

uint::construct_uint! {
    struct U256(4);
}

/// Constant product (x * y = k) venue settling against a [`TokenLedger`].
/// Reserves are the venue's own live ledger balances of the two pool tokens;
/// pricing follows the Uniswap V2 integer formula with a bps fee on input.
pub struct ConstantProductVenue {
    ledger: Arc<dyn TokenLedger>,
    address: Address,
    name: String,
    token_a: Address,
    token_b: Address,
    fee_bps: u16,
}

impl ConstantProductVenue {
    pub fn new(
        ledger: Arc<dyn TokenLedger>,
        name: impl Into<String>,
        token_a: Address,
        token_b: Address,
        fee_bps: u16,
    ) -> Self {
        Self {
            ledger,
            address: Address::new_unique(),
            name: name.into(),
            token_a,
            token_b,
            fee_bps,
        }
    }

    fn check_pair(&self, token_in: Address, token_out: Address) -> SwapResult<()> {
        let supported = (token_in == self.token_a && token_out == self.token_b)
            || (token_in == self.token_b && token_out == self.token_a);
        if supported {
            Ok(())
        } else {
            Err(SwapError::UnsupportedPair {
                venue: self.address,
                token_in,
                token_out,
            })
        }
    }

    async fn reserves(
        &self,
        token_in: Address,
        token_out: Address,
    ) -> SwapResult<(u128, u128)> {
        let reserve_in = self.ledger.balance_of(token_in, self.address).await?;
        let reserve_out = self.ledger.balance_of(token_out, self.address).await?;
        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::NoLiquidity {
                venue: self.address,
                token_in,
                token_out,
            });
        }
        Ok((reserve_in, reserve_out))
    }

    /// output = (reserve_out * amount_in_with_fee) / (reserve_in * 10000 + amount_in_with_fee)
    /// computed in 256 bits; no rounding beyond the integer division the
    /// pricing curve itself performs.
    fn output_amount(
        &self,
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> SwapResult<u128> {
        if amount_in == 0 {
            return Ok(0);
        }

        let fee_multiplier = U256::from(BPS_DENOMINATOR - u128::from(self.fee_bps));
        let amount_in_with_fee = U256::from(amount_in)
            .checked_mul(fee_multiplier)
            .ok_or(SwapError::MathOverflow)?;
        let numerator = U256::from(reserve_out)
            .checked_mul(amount_in_with_fee)
            .ok_or(SwapError::MathOverflow)?;
        let denominator = U256::from(reserve_in)
            .checked_mul(U256::from(BPS_DENOMINATOR))
            .and_then(|d| d.checked_add(amount_in_with_fee))
            .ok_or(SwapError::MathOverflow)?;

        let amount_out = numerator / denominator;
        if amount_out > U256::from(u128::MAX) {
            return Err(SwapError::MathOverflow);
        }
        Ok(amount_out.as_u128())
    }
}

#[async_trait::async_trait]
impl Venue for ConstantProductVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
    ) -> SwapResult<u128> {
        self.check_pair(token_in, token_out)?;
        let (reserve_in, reserve_out) = self.reserves(token_in, token_out).await?;

        let amount_out = self.output_amount(amount_in, reserve_in, reserve_out)?;
        debug!(
            "{} quote: {} {} -> {} {} (reserves {}/{})",
            self.name, amount_in, token_in, amount_out, token_out, reserve_in, reserve_out
        );
        Ok(amount_out)
    }

    async fn execute(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
        min_amount_out: u128,
        payer: Address,
        recipient: Address,
    ) -> SwapResult<u128> {
        self.check_pair(token_in, token_out)?;
        let (reserve_in, reserve_out) = self.reserves(token_in, token_out).await?;
        let amount_out = self.output_amount(amount_in, reserve_in, reserve_out)?;

        // All checks precede any transfer so a failed execute moves nothing.
        if amount_out < min_amount_out {
            return Err(SwapError::SlippageExceeded {
                venue: self.address,
                quoted: min_amount_out,
                realized: amount_out,
            });
        }

        let granted = self.ledger.allowance(token_in, payer, self.address).await?;
        if granted < amount_in {
            return Err(SwapError::InsufficientAllowance {
                spender: self.address,
                granted,
                required: amount_in,
            });
        }

        self.ledger
            .transfer_from(token_in, self.address, payer, self.address, amount_in)
            .await?;
        self.ledger
            .transfer(token_out, self.address, recipient, amount_out)
            .await?;

        debug!(
            "{} executed: {} {} -> {} {} for {}",
            self.name, amount_in, token_in, amount_out, token_out, recipient
        );
        Ok(amount_out)
    }
}
