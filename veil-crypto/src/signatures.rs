pub use ed25519_dalek::SigningKey;
use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use anyhow::{Result, anyhow, bail};

pub const SIGNATURE_LEN: usize = 64;

pub fn generate_keypair() -> SigningKey {
    let mut csprng = OsRng;
    SigningKey::generate(&mut csprng)
}

pub fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    let sig: Signature = key.sign(message);
    sig.to_bytes().to_vec()
}

pub fn verify_signature(pubkey_bytes: &[u8; 32], message: &[u8], signature_bytes: &[u8]) -> Result<()> {
    let pubkey = VerifyingKey::from_bytes(pubkey_bytes).map_err(|_| anyhow!("Invalid public key"))?;

    let sig_bytes: &[u8; SIGNATURE_LEN] = signature_bytes
        .try_into()
        .map_err(|_| anyhow!("Invalid signature length"))?;
    let signature = Signature::from_bytes(sig_bytes);

    if pubkey.verify(message, &signature).is_err() {
        bail!("Signature verification failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let kp = generate_keypair();
        let pk = kp.verifying_key().to_bytes();
        let sig = sign(&kp, b"hello");
        assert!(verify_signature(&pk, b"hello", &sig).is_ok());
        assert!(verify_signature(&pk, b"hullo", &sig).is_err());
        assert!(verify_signature(&pk, b"hello", &sig[..10]).is_err());
    }
}
