//! Constants used throughout the relay agent

/// Token contract defaults
pub mod contracts {
    /// Default token contract the agent relays
    pub const DEFAULT_TOKEN_CONTRACT_ADDR: &str = "0xa9d23408b9ba935c230493c40c73824df71a0975";

    /// Decimals assumed for the token when none are configured
    pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

    /// Largest decimals value whose unit (10^decimals) fits in a U256
    pub const MAX_TOKEN_DECIMALS: u32 = 77;
}

/// Default RPC endpoints
pub mod endpoints {
    /// Taiko mainnet RPC URL
    pub const TAIKO_MAINNET_URL: &str = "https://rpc.taiko.xyz";
}

/// Gas constants
pub mod gas {
    /// Lower bound (inclusive) of the sampled gas limit
    pub const DEFAULT_GAS_LIMIT_MIN: u64 = 30_000;

    /// Upper bound (exclusive) of the sampled gas limit
    pub const DEFAULT_GAS_LIMIT_MAX: u64 = 60_000;
}

/// Transfer amount bounds, in decimal token units
pub mod amounts {
    use rust_decimal::Decimal;

    /// Lower bound (inclusive), 0.001
    pub const DEFAULT_MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

    /// Upper bound (exclusive), 0.01
    pub const DEFAULT_MAX_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
}

/// Scheduling and timeout defaults
pub mod timing {
    /// Delay between two cycles of either loop
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 100;

    /// Per-call JSON-RPC timeout
    pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

    /// How long to wait for a broadcast transaction to be mined
    pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

    /// Delay between two receipt lookups
    pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
}

/// Contract ABI constants
pub mod abi {
    /// Function used to read a holder's balance
    pub const BALANCE_OF: &str = "balanceOf";

    /// Function used to move tokens
    pub const TRANSFER: &str = "transfer";

    /// Minimal ERC20 ABI used when no interface file is supplied
    pub const ERC20_ABI: &str = r#"[
        {
            "inputs": [
                {"internalType": "address", "name": "account", "type": "address"}
            ],
            "name": "balanceOf",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [
                {"internalType": "address", "name": "to", "type": "address"},
                {"internalType": "uint256", "name": "amount", "type": "uint256"}
            ],
            "name": "transfer",
            "outputs": [{"internalType": "bool", "name": "", "type": "bool"}],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ]"#;
}
