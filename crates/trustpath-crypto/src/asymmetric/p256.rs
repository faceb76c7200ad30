use p256::{
    ecdsa::{signature::Signer, signature::Verifier, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey, SecretKey,
};
use rand_core::OsRng;

use crate::error::Result;

pub struct P256 {
    pub inner: SecretKey,
}

impl From<SecretKey> for P256 {
    fn from(value: SecretKey) -> Self {
        Self { inner: value }
    }
}

impl P256 {
    /// 生成新的P-256密钥对
    pub fn generate() -> Self {
        SecretKey::random(&mut OsRng).into()
    }

    /// 从原始标量字节创建
    pub fn from_raw_scalar(bytes: &[u8; 32]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes)?;
        Ok(secret_key.into())
    }

    /// 获取原始标量字节
    pub fn to_scalar_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// 获取该密钥对的公钥
    pub fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    /// 公钥的非压缩SEC1编码（65字节）
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key().to_encoded_point(false).as_bytes().to_vec()
    }

    /// 使用SHA-256的ECDSA签名数据，DER编码
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::from(&self.inner);
        let signature: Signature = signing_key.sign(message);
        signature.to_der().as_bytes().to_vec()
    }
}

/// 使用SEC1编码公钥验证P-256 ECDSA/SHA-256签名。
///
/// 同时接受DER编码签名和固定64字节的 `r || s` 形式。
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let verifying_key = match VerifyingKey::from_sec1_bytes(public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = match Signature::from_der(signature) {
        Ok(sig) => sig,
        Err(_) => match Signature::from_slice(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        },
    };
    verifying_key.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let key = P256::generate();
        // P-256公钥非压缩形式为65字节（0x04 + 32 + 32）
        assert_eq!(key.public_key_bytes().len(), 65);
    }

    #[test]
    fn test_sign_verify() {
        let key = P256::from_raw_scalar(&[5u8; 32]).unwrap();
        let message = b"Hello, P-256!";
        let signature = key.sign(message);

        assert!(verify(&key.public_key_bytes(), message, &signature));
        assert!(!verify(&key.public_key_bytes(), b"other", &signature));
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(P256::from_raw_scalar(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage_key() {
        let key = P256::from_raw_scalar(&[5u8; 32]).unwrap();
        let signature = key.sign(b"msg");
        assert!(!verify(&[4u8; 10], b"msg", &signature));
    }
}
