pub mod form;
pub mod intention;
pub mod log;
pub mod token;
pub mod utxo;

pub use form::*;
pub use intention::*;
pub use log::*;
pub use token::*;
pub use utxo::*;

pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Factory contract that exposes `createToken(string,string,uint256)`
pub const FACTORY_CONTRACT_ADDRESS: &str = "0x5447Ef425888C2f464F53B485B5E2fFCD4Df168f";

/// Bonding curve pricing constant passed to every `createToken` call (1e12)
pub const DEFAULT_BONDING_CURVE_K: u128 = 1_000_000_000_000;

/// Supply shown in the advanced form until the user edits it
pub const DEFAULT_SUPPLY: &str = "1000000";
