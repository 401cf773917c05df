use crate::core::{SwapError, SwapResult};
use crate::venues::Venue;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 20-byte account identifier for tokens, venues, callers and the router
/// itself. Rendered as lowercase `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Generate a process-unique address. Intended for tests and local
    /// in-memory ledgers, not for anything that must survive a restart.
    pub fn new_unique() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 20];
        bytes[12..20].copy_from_slice(&n.to_be_bytes());
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(raw)
            .map_err(|e| SwapError::InvalidAddress(format!("{}: {}", s, e)))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| SwapError::InvalidAddress(format!("{}: expected 20 bytes", s)))?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}

/// One swap order: pull `amount_in` of `token_in` from `caller`, exchange it
/// through the best of `venues`, deliver the proceeds to `recipient`.
/// Constructed per call and discarded after one receipt or failure.
#[derive(Clone)]
pub struct SwapRequest {
    pub caller: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub recipient: Address,
    pub venues: Vec<Arc<dyn Venue>>,
}

impl SwapRequest {
    pub fn validate(&self) -> SwapResult<()> {
        if self.amount_in == 0 {
            return Err(SwapError::InvalidRequest("amount_in must be positive".to_string()));
        }
        if self.token_in == self.token_out {
            return Err(SwapError::InvalidRequest(format!(
                "token_in and token_out are identical: {}",
                self.token_in
            )));
        }
        if self.venues.is_empty() {
            return Err(SwapError::InvalidRequest("no candidate venues supplied".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for SwapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapRequest")
            .field("caller", &self.caller)
            .field("token_in", &self.token_in)
            .field("token_out", &self.token_out)
            .field("amount_in", &self.amount_in)
            .field("recipient", &self.recipient)
            .field("venues", &self.venues.iter().map(|v| v.address()).collect::<Vec<_>>())
            .finish()
    }
}

/// Audit record of a settled swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub venue_used: Address,
    pub amount_out_delivered: u128,
}

/// Orchestration phases of one swap call. `Failed` is reachable from any
/// phase; `Settled` is the only successful terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapPhase {
    Idle,
    Pulled,
    Quoted,
    Selected,
    Executed,
    Settled,
    Failed,
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapPhase::Idle => write!(f, "Idle"),
            SwapPhase::Pulled => write!(f, "Pulled"),
            SwapPhase::Quoted => write!(f, "Quoted"),
            SwapPhase::Selected => write!(f, "Selected"),
            SwapPhase::Executed => write!(f, "Executed"),
            SwapPhase::Settled => write!(f, "Settled"),
            SwapPhase::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::WETH_ADDRESS;
    use async_trait::async_trait;
    use test_case::test_case;

    #[test]
    fn test_address_roundtrip() {
        let addr: Address = WETH_ADDRESS.parse().unwrap();
        assert_eq!(addr.to_string(), WETH_ADDRESS);
        assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_address_accepts_unprefixed() {
        let prefixed: Address = WETH_ADDRESS.parse().unwrap();
        let bare: Address = WETH_ADDRESS.trim_start_matches("0x").parse().unwrap();
        assert_eq!(prefixed, bare);
    }

    #[test_case("0x1234" ; "too short")]
    #[test_case("not-hex-at-all" ; "not hex")]
    #[test_case("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2ff" ; "too long")]
    fn test_address_rejects(input: &str) {
        assert!(input.parse::<Address>().is_err());
    }

    #[test]
    fn test_address_unique() {
        let a = Address::new_unique();
        let b = Address::new_unique();
        assert_ne!(a, b);
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let addr: Address = WETH_ADDRESS.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", WETH_ADDRESS));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    struct NoopVenue {
        address: Address,
    }

    #[async_trait]
    impl Venue for NoopVenue {
        fn address(&self) -> Address {
            self.address
        }

        fn name(&self) -> &str {
            "noop"
        }

        async fn quote(&self, _: Address, _: Address, _: u128) -> SwapResult<u128> {
            Ok(0)
        }

        async fn execute(
            &self,
            _: Address,
            _: Address,
            _: u128,
            _: u128,
            _: Address,
            _: Address,
        ) -> SwapResult<u128> {
            Ok(0)
        }
    }

    fn request_with(amount_in: u128, same_tokens: bool, venue_count: usize) -> SwapRequest {
        let token_in = Address::new_unique();
        let token_out = if same_tokens { token_in } else { Address::new_unique() };
        let venues = (0..venue_count)
            .map(|_| Arc::new(NoopVenue { address: Address::new_unique() }) as Arc<dyn Venue>)
            .collect();
        SwapRequest {
            caller: Address::new_unique(),
            token_in,
            token_out,
            amount_in,
            recipient: Address::new_unique(),
            venues,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(request_with(1, false, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_amount() {
        let err = request_with(0, false, 1).validate().unwrap_err();
        assert!(matches!(err, SwapError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_identical_tokens() {
        let err = request_with(1, true, 1).validate().unwrap_err();
        assert!(matches!(err, SwapError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_empty_venue_list() {
        let err = request_with(1, false, 0).validate().unwrap_err();
        assert!(matches!(err, SwapError::InvalidRequest(_)));
    }
}
