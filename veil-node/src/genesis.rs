use crate::config::GenesisConfig;
use anyhow::{anyhow, bail, Context, Result};
use veil_types::keys::WalletKey;
use veil_types::state::LedgerState;

/// `admin_override` wins over the configured admin.
pub fn create_genesis_state(config: &GenesisConfig, admin_override: Option<WalletKey>) -> Result<LedgerState> {
    let admin = match admin_override {
        Some(admin) => admin,
        None => config
            .admin_key()?
            .ok_or_else(|| anyhow!("Genesis requires an admin wallet key"))?,
    };

    let mut state = LedgerState::new(admin);
    for provider in &config.providers {
        let mut key = [0u8; 32];
        hex::decode_to_slice(provider.public_key.trim_start_matches("0x"), &mut key)
            .with_context(|| format!("decoding public key of provider {}", provider.id))?;
        if state.providers.insert(provider.id, key).is_some() {
            bail!("Duplicate genesis provider id {}", provider.id);
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn builds_admin_and_registry() {
        let config = GenesisConfig {
            admin: Some(hex::encode([1u8; 32])),
            providers: vec![ProviderConfig {
                id: 4,
                public_key: hex::encode([2u8; 32]),
            }],
        };
        let state = create_genesis_state(&config, None).unwrap();
        assert_eq!(state.admin, WalletKey([1u8; 32]));
        assert_eq!(state.provider(4), Some(&[2u8; 32]));

        let overridden = create_genesis_state(&config, Some(WalletKey([9u8; 32]))).unwrap();
        assert_eq!(overridden.admin, WalletKey([9u8; 32]));
    }

    #[test]
    fn requires_admin_and_unique_providers() {
        assert!(create_genesis_state(&GenesisConfig::default(), None).is_err());

        let dup = ProviderConfig {
            id: 1,
            public_key: hex::encode([2u8; 32]),
        };
        let config = GenesisConfig {
            admin: Some(hex::encode([1u8; 32])),
            providers: vec![dup.clone(), dup],
        };
        assert!(create_genesis_state(&config, None).is_err());
    }
}
