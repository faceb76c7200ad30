use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;

pub struct Ed25519 {
    pub inner: SigningKey,
}

impl From<SigningKey> for Ed25519 {
    fn from(value: SigningKey) -> Self {
        Self { inner: value }
    }
}

impl Ed25519 {
    pub fn generate() -> Self {
        SigningKey::generate(&mut OsRng).into()
    }

    pub fn from_raw_seed(seed: &[u8; 32]) -> Self {
        SigningKey::from_bytes(seed).into()
    }

    /// 以原始字节导出私钥
    pub fn to_seed_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// 获取该密钥对的公钥
    pub fn public_key(&self) -> VerifyingKey {
        self.inner.verifying_key()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key().to_bytes()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.inner.sign(message).to_bytes()
    }
}

/// 使用32字节原始公钥验证Ed25519签名
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public_key) = <[u8; 32]>::try_from(public_key) else {
        return false;
    };
    let Ok(signature) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let verifying_key = match VerifyingKey::from_bytes(&public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = Signature::from_bytes(&signature);
    verifying_key.verify(message, &signature).is_ok()
}
