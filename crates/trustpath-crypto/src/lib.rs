//! Trustpath 密码学库
//!
//! trustpath 验证引擎使用的签名原语。引擎从不直接
//! 接触密钥材料，而是询问 [`SignatureVerifier`]
//! 某个签名内容上的签名在给定公钥下是否有效。

pub mod algorithm;
pub mod asymmetric;
pub mod error;
pub mod hash;

// 重新导出常用类型，方便使用
pub use algorithm::{KeyPair, SignatureAlgorithm};
pub use asymmetric::{
    ed25519::Ed25519, p256::P256, verify_signature, DefaultVerifier, SignatureVerifier,
};
pub use error::{Error, Result};
pub use hash::{sha256, sha256_hex};
