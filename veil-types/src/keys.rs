use serde::{Deserialize, Serialize};
use std::fmt;

pub type Pin = u16;
pub type LoanId = u64;
pub type ProviderId = u32;

/// Raw ed25519 public key bytes of an attestation provider.
pub type ProviderPublicKey = [u8; 32];

/// Pseudonymous ledger key derived one-way from a caller secret and a PIN.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserKey(pub [u8; 32]);

/// PIN-independent caller identity (the caller's ed25519 public key).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletKey(pub [u8; 32]);

impl UserKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl WalletKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut out)?;
        Ok(Self(out))
    }

    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Display for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_key_hex_roundtrip_accepts_prefix() {
        let key = WalletKey([0xab; 32]);
        let parsed = WalletKey::from_hex(&format!("0x{}", key)).unwrap();
        assert_eq!(parsed, key);
        assert!(WalletKey::from_hex("abcd").is_err());
    }
}
