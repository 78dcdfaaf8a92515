use ed25519_dalek::{
    Signer as _,
    SigningKey,
};
use housebook_contract::AccountId;
use sha2::{
    Digest,
    Sha256,
};

/// Signs submission payloads with the resolver's ed25519 key. Signatures are
/// over the SHA-256 digest of the canonical payload bytes.
pub struct TransactionSigner {
    key: SigningKey,
    account: AccountId,
}

impl TransactionSigner {
    pub fn new(key: SigningKey, account: AccountId) -> Self {
        Self { key, account }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    pub fn sign_hex(&self, payload: &[u8]) -> String {
        let digest = Sha256::digest(payload);
        hex::encode(self.key.sign(digest.as_slice()).to_bytes())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use ed25519_dalek::{
        Signature,
        Verifier,
    };

    fn test_signer() -> TransactionSigner {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        TransactionSigner::new(key, AccountId::from("resolver-v0.testnet"))
    }

    #[test]
    fn sign_hex__produces_verifiable_signature_over_digest() {
        // given
        let signer = test_signer();
        let payload = br#"{"method":"resolve_game"}"#;

        // when
        let signature_hex = signer.sign_hex(payload);

        // then
        let signature_bytes: [u8; 64] = hex::decode(signature_hex)
            .unwrap()
            .try_into()
            .expect("64 byte signature");
        let signature = Signature::from_bytes(&signature_bytes);
        let verifying_key = SigningKey::from_bytes(&[7u8; 32]).verifying_key();
        let digest = Sha256::digest(payload);
        assert!(verifying_key.verify(digest.as_slice(), &signature).is_ok());
    }

    #[test]
    fn public_key_hex__is_stable_for_a_given_seed() {
        let signer = test_signer();
        assert_eq!(signer.public_key_hex(), {
            let expected = SigningKey::from_bytes(&[7u8; 32]);
            hex::encode(expected.verifying_key().to_bytes())
        });
    }
}
