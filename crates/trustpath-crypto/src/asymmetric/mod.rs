//! 非对称签名算法
//!
//! 本模块提供签名实现以及验证引擎调用的
//! [`SignatureVerifier`] 接口。

pub mod ed25519;
pub mod p256;

pub use self::ed25519::Ed25519;
pub use self::p256::P256;
use crate::algorithm::SignatureAlgorithm;

/// 使用公钥检查签名内容上签名的能力。
///
/// 实现必须无副作用，对任何格式错误的密钥或签名
/// 返回 `false` 而不是panic。
pub trait SignatureVerifier: Send + Sync {
    fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        public_key: &[u8],
        signed_content: &[u8],
        signature: &[u8],
    ) -> bool;
}

/// 基于 `ed25519-dalek` 和 `p256` 的验证器
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVerifier;

impl SignatureVerifier for DefaultVerifier {
    fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        public_key: &[u8],
        signed_content: &[u8],
        signature: &[u8],
    ) -> bool {
        verify_signature(algorithm, public_key, signed_content, signature)
    }
}

/// 使用算法的原始公钥编码验证签名
pub fn verify_signature(
    algorithm: SignatureAlgorithm,
    public_key: &[u8],
    signed_content: &[u8],
    signature: &[u8],
) -> bool {
    match algorithm {
        SignatureAlgorithm::Ed25519 => ed25519::verify(public_key, signed_content, signature),
        SignatureAlgorithm::EcdsaP256Sha256 => p256::verify(public_key, signed_content, signature),
    }
}
