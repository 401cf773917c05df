use crate::core::{constants::*, Address};
use std::str::FromStr;

/// Parse a token symbol or hex address to an Address
pub fn parse_token_identifier(input: &str) -> Option<Address> {
    // First try to parse as a raw address
    if let Ok(addr) = Address::from_str(input) {
        return Some(addr);
    }

    // Common token mappings
    match input.to_uppercase().as_str() {
        "WETH" | "ETH" => Some(*WETH),
        "DAI" => Some(*DAI),
        "MANA" => Some(*MANA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_identifier() {
        // Known symbols, case insensitive
        assert_eq!(parse_token_identifier("WETH"), Some(*WETH));
        assert_eq!(parse_token_identifier("dai"), Some(*DAI));
        assert_eq!(parse_token_identifier("Mana"), Some(*MANA));

        // Raw address parsing
        assert_eq!(parse_token_identifier(WETH_ADDRESS), Some(*WETH));

        // Unknown symbol
        assert_eq!(parse_token_identifier("UNKNOWN"), None);
    }
}
