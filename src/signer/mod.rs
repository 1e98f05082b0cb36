//! Credentials, transaction signing and transfer sampling

pub mod credentials;
pub mod transaction;
pub mod utils;

pub use credentials::{Credential, CredentialSet};
pub use transaction::sign_transfer;
pub use utils::*;
