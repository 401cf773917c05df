use crate::core::{constants::*, error::SwapResult, types::Address, SwapError};
use crate::utils::parse_token_identifier;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token used for native-asset wrapping. Write-once: the router captures
    /// it at construction and never changes it afterwards.
    pub wrapped_native: Address,
    /// Upper bound on the candidate venue list accepted per swap call.
    pub max_candidate_venues: usize,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        // Accepts a hex address or a known token symbol.
        let wrapped_native = match env::var("WRAPPED_NATIVE_ADDRESS") {
            Ok(raw) => parse_token_identifier(&raw).ok_or_else(|| {
                SwapError::ConfigError(format!("WRAPPED_NATIVE_ADDRESS: unknown token {}", raw))
            })?,
            Err(_) => *WETH,
        };

        Ok(Self {
            wrapped_native,
            max_candidate_venues: env::var("MAX_CANDIDATE_VENUES")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_MAX_CANDIDATE_VENUES),
        })
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.max_candidate_venues == 0 {
            return Err(SwapError::ConfigError(
                "Max candidate venues must be greater than 0".to_string(),
            ));
        }

        if self.wrapped_native == Address::ZERO {
            return Err(SwapError::ConfigError(
                "Wrapped native token address cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrapped_native: *WETH,
            max_candidate_venues: DEFAULT_MAX_CANDIDATE_VENUES,
        }
    }
}
