//! Error types for the relay agent

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Main error type for agent operations
///
/// Startup problems (credentials, configuration, no reachable node) are fatal;
/// everything else is scoped to a single wallet in a single cycle.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Node connectivity or JSON-RPC errors
    #[error("Network error: {0}")]
    Network(String),

    /// The token contract rejected the call or the mined transaction reverted
    #[error("Contract reverted: {0}")]
    ContractRevert(String),

    /// Transaction signing errors
    #[error("Signing error: {0}")]
    Signing(String),

    /// ABI encoding/decoding errors
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A node call did not answer in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// A private key in the credential set is malformed
    #[error("Invalid private key at index {index}: {reason}")]
    InvalidCredential {
        /// Position of the key in the credential file
        index: usize,
        /// Why the key was rejected
        reason: String,
    },

    /// The credential set has no entries
    #[error("Credential set is empty")]
    EmptyCredentialSet,

    /// Every configured endpoint failed its liveness check
    #[error("No valid RPC URLs available ({tried} tried)")]
    NoEndpointAvailable {
        /// Number of endpoints probed
        tried: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File access errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new contract revert error
    pub fn contract_revert(message: impl Into<String>) -> Self {
        Self::ContractRevert(message.into())
    }

    /// Create a new signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing(message.into())
    }

    /// Create a new encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create a new timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new invalid credential error
    pub fn invalid_credential(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidCredential {
            index,
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify a node-side failure message.
    ///
    /// Nodes report reverts as ordinary JSON-RPC errors, so the message text is
    /// the only signal available.
    pub fn from_rpc_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_lowercase().contains("revert") {
            Self::ContractRevert(message)
        } else {
            Self::Network(message)
        }
    }

    /// Whether this error must stop the process rather than the current wallet
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential { .. }
                | Self::EmptyCredentialSet
                | Self::NoEndpointAvailable { .. }
                | Self::Config(_)
        )
    }
}
