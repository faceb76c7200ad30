//! 签名密钥的统一算法接口
//!
//! 为支持的签名算法提供创建签名密钥的统一入口，
//! 并用于签名证书和CRL的内容。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    asymmetric::{ed25519::Ed25519, p256::P256},
    error::{Error, Result},
};

/// 支持的签名算法
///
/// 摘要是算法的一部分：Ed25519内部使用SHA-512哈希，
/// ECDSA P-256签名SHA-256摘要。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    /// Ed25519签名算法
    Ed25519,
    /// 基于NIST P-256和SHA-256的ECDSA，DER编码签名
    EcdsaP256Sha256,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::EcdsaP256Sha256 => "ecdsa-p256-sha256",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "ecdsa-p256-sha256" | "p256" | "es256" => Ok(Self::EcdsaP256Sha256),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// 支持算法之一的签名密钥
pub enum KeyPair {
    Ed25519(Ed25519),
    P256(P256),
}

impl KeyPair {
    /// 从操作系统随机源生成新的密钥对
    pub fn generate(algorithm: SignatureAlgorithm) -> Result<Self> {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Ok(Self::Ed25519(Ed25519::generate())),
            SignatureAlgorithm::EcdsaP256Sha256 => Ok(Self::P256(P256::generate())),
        }
    }

    /// 从32字节种子确定性派生密钥对
    ///
    /// # 示例
    /// ```
    /// use trustpath_crypto::{KeyPair, SignatureAlgorithm};
    ///
    /// let a = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[7u8; 32]).unwrap();
    /// let b = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[7u8; 32]).unwrap();
    /// assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    /// ```
    pub fn from_seed(algorithm: SignatureAlgorithm, seed: &[u8; 32]) -> Result<Self> {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Ok(Self::Ed25519(Ed25519::from_raw_seed(seed))),
            SignatureAlgorithm::EcdsaP256Sha256 => Ok(Self::P256(P256::from_raw_scalar(seed)?)),
        }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::Ed25519(_) => SignatureAlgorithm::Ed25519,
            Self::P256(_) => SignatureAlgorithm::EcdsaP256Sha256,
        }
    }

    /// 原始公钥：Ed25519为32字节，P-256为非压缩SEC1点
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.public_key_bytes().to_vec(),
            Self::P256(key) => key.public_key_bytes(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.sign(message).to_vec(),
            Self::P256(key) => key.sign(message),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asymmetric::verify_signature;

    #[test]
    fn test_algorithm_names_round_trip() {
        for alg in [SignatureAlgorithm::Ed25519, SignatureAlgorithm::EcdsaP256Sha256] {
            assert_eq!(alg.as_str().parse::<SignatureAlgorithm>().unwrap(), alg);
        }
        assert!(matches!(
            "rsa-sha1".parse::<SignatureAlgorithm>(),
            Err(Error::UnsupportedAlgorithm(name)) if name == "rsa-sha1"
        ));
    }

    #[test]
    fn test_algorithm_serde_names() {
        let json = serde_json::to_string(&SignatureAlgorithm::EcdsaP256Sha256).unwrap();
        assert_eq!(json, "\"ecdsa-p256-sha256\"");
    }

    #[test]
    fn test_keypair_sign_and_verify() {
        for alg in [SignatureAlgorithm::Ed25519, SignatureAlgorithm::EcdsaP256Sha256] {
            let key = KeyPair::from_seed(alg, &[42u8; 32]).unwrap();
            let signature = key.sign(b"to be signed");
            assert!(verify_signature(
                alg,
                &key.public_key_bytes(),
                b"to be signed",
                &signature
            ));
            assert!(!verify_signature(
                alg,
                &key.public_key_bytes(),
                b"tampered",
                &signature
            ));
        }
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = KeyPair::generate(SignatureAlgorithm::Ed25519).unwrap();
        let b = KeyPair::generate(SignatureAlgorithm::Ed25519).unwrap();
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());
    }
}
