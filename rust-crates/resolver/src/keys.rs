use anyhow::{
    Context,
    Result,
    anyhow,
    bail,
};
use ed25519_dalek::SigningKey;
use eth_keystore::decrypt_key;
use rpassword::prompt_password;
use std::path::PathBuf;

/// Hex-encoded 32-byte seed; takes precedence over any keystore file.
pub const SECRET_KEY_ENV: &str = "RESOLVER_SECRET_KEY";

/// Loads the resolver's signing key from the environment or an encrypted
/// keystore file. The credential itself is opaque configuration; only its
/// shape (a 32-byte ed25519 seed) matters here.
pub fn load_resolver_key(keystore_path: Option<&str>) -> Result<SigningKey> {
    if let Ok(raw) = std::env::var(SECRET_KEY_ENV) {
        return signing_key_from_hex(raw.trim());
    }

    let Some(raw_path) = keystore_path else {
        bail!("No resolver key: set {SECRET_KEY_ENV} or pass --keystore");
    };
    let expanded = shellexpand::tilde(raw_path);
    let path = PathBuf::from(expanded.into_owned());
    let prompt = format!("Enter password for keystore '{}': ", path.display());
    let password =
        prompt_password(prompt).context("Failed to read keystore password")?;

    let secret = decrypt_key(&path, password.as_bytes())
        .map_err(|_| anyhow!("Invalid password for keystore '{}'", path.display()))?;
    signing_key_from_bytes(&secret)
}

fn signing_key_from_hex(raw: &str) -> Result<SigningKey> {
    let bytes = hex::decode(raw).context("resolver key is not valid hex")?;
    signing_key_from_bytes(&bytes)
}

fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey> {
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow!("resolver key must be exactly 32 bytes"))?;
    Ok(SigningKey::from_bytes(&seed))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn signing_key_from_hex__accepts_a_32_byte_seed() {
        let seed_hex = "11".repeat(32);
        let key = signing_key_from_hex(&seed_hex).unwrap();
        assert_eq!(key.to_bytes(), [0x11u8; 32]);
    }

    #[test]
    fn signing_key_from_hex__rejects_wrong_length() {
        assert!(signing_key_from_hex("deadbeef").is_err());
    }

    #[test]
    fn signing_key_from_hex__rejects_non_hex_input() {
        assert!(signing_key_from_hex("not hex at all").is_err());
    }
}
