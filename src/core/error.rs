use crate::core::types::Address;
use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid swap request: {0}")]
    InvalidRequest(String),

    #[error("Transfer failed for token {token}: {reason}")]
    TransferFailed { token: Address, reason: String },

    #[error("No route available for pair {token_in}/{token_out}")]
    NoRouteAvailable { token_in: Address, token_out: Address },

    #[error("Slippage exceeded on venue {venue}: quoted {quoted}, realized {realized}")]
    SlippageExceeded {
        venue: Address,
        quoted: u128,
        realized: u128,
    },

    #[error("Insufficient allowance for spender {spender}: granted {granted}, required {required}")]
    InsufficientAllowance {
        spender: Address,
        granted: u128,
        required: u128,
    },

    #[error("Venue {venue} does not trade pair {token_in}/{token_out}")]
    UnsupportedPair {
        venue: Address,
        token_in: Address,
        token_out: Address,
    },

    #[error("Venue {venue} has no liquidity for pair {token_in}/{token_out}")]
    NoLiquidity {
        venue: Address,
        token_in: Address,
        token_out: Address,
    },

    #[error("Math overflow in quote calculation")]
    MathOverflow,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for SwapError {
    fn from(err: anyhow::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}
