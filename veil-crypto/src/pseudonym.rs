use crate::signatures::{generate_keypair, SigningKey};
use std::fmt;
use veil_types::keys::{Pin, UserKey, WalletKey};

/// 32-byte caller secret. It is the ed25519 seed of the caller's wallet.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// One-way mapping from (secret, PIN) to a ledger pseudonym.
pub trait PseudonymDeriver {
    fn derive(&self, secret: &SecretKey, pin: Pin) -> UserKey;
}

/// BLAKE3 in key-derivation mode over `secret || pin_le`.
#[derive(Debug, Clone, Copy)]
pub struct Blake3Deriver {
    context: &'static str,
}

impl Blake3Deriver {
    pub const DEFAULT_CONTEXT: &'static str = "veil-ledger 2026-01-01 pseudonym v1";

    pub fn with_context(context: &'static str) -> Self {
        Self { context }
    }
}

impl Default for Blake3Deriver {
    fn default() -> Self {
        Self::with_context(Self::DEFAULT_CONTEXT)
    }
}

impl PseudonymDeriver for Blake3Deriver {
    fn derive(&self, secret: &SecretKey, pin: Pin) -> UserKey {
        let mut material = [0u8; 34];
        material[..32].copy_from_slice(secret.as_bytes());
        material[32..].copy_from_slice(&pin.to_le_bytes());
        UserKey(blake3::derive_key(self.context, &material))
    }
}

/// The party submitting a call, as seen by the ledger.
#[derive(Debug, Clone)]
pub struct Caller {
    secret: SecretKey,
    wallet: WalletKey,
}

impl Caller {
    pub fn from_signing_key(key: &SigningKey) -> Self {
        Self {
            secret: SecretKey(key.to_bytes()),
            wallet: WalletKey(key.verifying_key().to_bytes()),
        }
    }

    pub fn from_secret(secret: SecretKey) -> Self {
        let key = SigningKey::from_bytes(secret.as_bytes());
        Self::from_signing_key(&key)
    }

    pub fn generate() -> Self {
        Self::from_signing_key(&generate_keypair())
    }

    pub fn wallet(&self) -> WalletKey {
        self.wallet
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn user_key(&self, deriver: &dyn PseudonymDeriver, pin: Pin) -> UserKey {
        deriver.derive(&self.secret, pin)
    }
}
