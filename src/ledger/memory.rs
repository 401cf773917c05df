use crate::core::{Address, SwapError, SwapResult};
use crate::ledger::TokenLedger;
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct LedgerState {
    /// (token, owner) -> balance
    balances: HashMap<(Address, Address), u128>,
    /// (token, owner, spender) -> remaining allowance
    allowances: HashMap<(Address, Address, Address), u128>,
}

/// In-memory reference ledger. All mutation happens under a single lock, so
/// each operation observes and produces a consistent state; a failed
/// operation leaves the state untouched.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `to` with freshly issued units of `token`. Stands in for
    /// deposits arriving from outside the router's world.
    pub fn mint(&self, token: Address, to: Address, amount: u128) {
        let mut state = self.state.lock().expect("ledger lock poisoned");
        let balance = state.balances.entry((token, to)).or_insert(0);
        *balance = balance.saturating_add(amount);
        debug!("minted {} of {} to {}", amount, token, to);
    }
}

#[async_trait::async_trait]
impl TokenLedger for InMemoryLedger {
    async fn balance_of(&self, token: Address, owner: Address) -> SwapResult<u128> {
        let state = self.state.lock().expect("ledger lock poisoned");
        Ok(state.balances.get(&(token, owner)).copied().unwrap_or(0))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SwapResult<u128> {
        let state = self.state.lock().expect("ledger lock poisoned");
        Ok(state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0))
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> SwapResult<()> {
        let mut state = self.state.lock().expect("ledger lock poisoned");
        state.allowances.insert((token, owner, spender), amount);
        debug!("{} approved {} to spend {} of {}", owner, spender, amount, token);
        Ok(())
    }

    async fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> SwapResult<()> {
        let mut state = self.state.lock().expect("ledger lock poisoned");
        let from_balance = state.balances.get(&(token, from)).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(SwapError::TransferFailed {
                token,
                reason: format!("balance {} below required {}", from_balance, amount),
            });
        }
        state.balances.insert((token, from), from_balance - amount);
        let to_balance = state.balances.entry((token, to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        debug!("transferred {} of {} from {} to {}", amount, token, from, to);
        Ok(())
    }

    async fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> SwapResult<()> {
        let mut state = self.state.lock().expect("ledger lock poisoned");

        let granted = state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0);
        if granted < amount {
            return Err(SwapError::InsufficientAllowance {
                spender,
                granted,
                required: amount,
            });
        }

        let owner_balance = state.balances.get(&(token, owner)).copied().unwrap_or(0);
        if owner_balance < amount {
            return Err(SwapError::TransferFailed {
                token,
                reason: format!("owner balance {} below required {}", owner_balance, amount),
            });
        }

        state.allowances.insert((token, owner, spender), granted - amount);
        state.balances.insert((token, owner), owner_balance - amount);
        let to_balance = state.balances.entry((token, to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        debug!(
            "{} moved {} of {} from {} to {}",
            spender, amount, token, owner, to
        );
        Ok(())
    }
}
