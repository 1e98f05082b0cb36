//! Wallet credentials loaded once at startup

use crate::error::{AgentError, Result};
use ethers::{
    signers::{LocalWallet, Signer},
    types::Address,
};
use std::{fmt, fs, path::Path, str::FromStr};

/// A private key and the address it derives
#[derive(Clone)]
pub struct Credential {
    wallet: LocalWallet,
}

impl Credential {
    /// Parse a hex private key, with or without `0x` prefix
    pub fn from_private_key(key: &str) -> std::result::Result<Self, String> {
        let wallet = LocalWallet::from_str(key.trim()).map_err(|e| e.to_string())?;
        Ok(Self { wallet })
    }

    /// Derived wallet address
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Signing wallet
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

// Never print key material.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.address())
            .finish()
    }
}

/// Ordered, non-empty, read-only set of credentials
///
/// Order matters: loops visit wallets in this order and recipient selection
/// picks the first other wallet in it.
#[derive(Debug, Clone)]
pub struct CredentialSet {
    credentials: Vec<Credential>,
}

impl CredentialSet {
    /// Validate every key, failing on the first malformed entry
    pub fn from_keys<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| {
                Credential::from_private_key(key.as_ref())
                    .map_err(|reason| AgentError::invalid_credential(index, reason))
            })
            .collect::<Result<Vec<_>>>()?;

        if credentials.is_empty() {
            return Err(AgentError::EmptyCredentialSet);
        }

        Ok(Self { credentials })
    }

    /// Parse a JSON array of hex private keys
    pub fn from_json(content: &str) -> Result<Self> {
        let keys: Vec<String> = serde_json::from_str(content.trim())?;
        Self::from_keys(keys)
    }

    /// Load a JSON array of hex private keys from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Number of wallets
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Wallets in load order
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }

    /// Derived addresses in load order
    pub fn addresses(&self) -> Vec<Address> {
        self.iter().map(Credential::address).collect()
    }

    /// First address in set order that differs from `sender`.
    ///
    /// Deterministic: the same sender always gets the same recipient. Returns
    /// `None` when every entry derives the sender's own address, e.g. a set of
    /// one.
    pub fn select_recipient(&self, sender: Address) -> Option<Address> {
        self.iter()
            .map(Credential::address)
            .find(|address| *address != sender)
    }
}
