use crate::core::types::Address;
use std::str::FromStr;

// Canonical mainnet token addresses
pub const WETH_ADDRESS: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const DAI_ADDRESS: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
pub const MANA_ADDRESS: &str = "0x0f5d2fb29fb7d3cfee444a200298f468908cc942";

// Well-known venue routers
pub const UNISWAP_V2_ROUTER_ADDRESS: &str = "0x7a250d5630b4cf539739df2c5dacb4c659f2488d";
pub const SUSHISWAP_ROUTER_ADDRESS: &str = "0xd9e1ce17f2641f24ae83637ab66a2cca9c378b9f";

// Token addresses as Address
lazy_static::lazy_static! {
    pub static ref WETH: Address = Address::from_str(WETH_ADDRESS).unwrap();
    pub static ref DAI: Address = Address::from_str(DAI_ADDRESS).unwrap();
    pub static ref MANA: Address = Address::from_str(MANA_ADDRESS).unwrap();
    pub static ref UNISWAP_V2_ROUTER: Address = Address::from_str(UNISWAP_V2_ROUTER_ADDRESS).unwrap();
    pub static ref SUSHISWAP_ROUTER: Address = Address::from_str(SUSHISWAP_ROUTER_ADDRESS).unwrap();
}

// Fee configuration
pub const BPS_DENOMINATOR: u128 = 10_000;
pub const DEFAULT_FEE_BPS: u16 = 30; // 0.3%

// Orchestration limits
pub const DEFAULT_MAX_CANDIDATE_VENUES: usize = 16;

// Event channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
