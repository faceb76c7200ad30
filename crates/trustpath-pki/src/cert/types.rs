use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use trustpath_crypto::{hash::sha256_parts, SignatureAlgorithm, SignatureVerifier};

use super::name::Name;
use crate::{
    codec::base64_bytes,
    error::{PkiError, Result},
};

/// 证书序列号，大端序且无前导零字节
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerialNumber(Vec<u8>);

impl SerialNumber {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self(bytes[start..].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 序列号能放入64位时返回整数值
    pub fn to_u64(&self) -> Option<u64> {
        if self.0.len() > 8 {
            return None;
        }
        Some(self.0.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }
}

impl From<u64> for SerialNumber {
    fn from(value: u64) -> Self {
        Self::from_bytes(&value.to_be_bytes())
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("00");
        }
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl FromStr for SerialNumber {
    type Err = PkiError;

    /// 解析十六进制序列号，可带 `0x` 前缀
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.is_empty() {
            return Err(PkiError::ParseError("empty serial number".to_string()));
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(&padded)
            .map_err(|e| PkiError::ParseError(format!("invalid serial number {s:?}: {e}")))?;
        Ok(Self::from_bytes(&bytes))
    }
}

impl TryFrom<String> for SerialNumber {
    type Error = PkiError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SerialNumber> for String {
    fn from(value: SerialNumber) -> Self {
        value.to_string()
    }
}

/// 主体公钥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub algorithm: SignatureAlgorithm,
    #[serde(with = "base64_bytes")]
    pub key: Vec<u8>,
}

impl PublicKey {
    pub fn new(algorithm: SignatureAlgorithm, key: Vec<u8>) -> Self {
        Self { algorithm, key }
    }

    /// 检查 `signature` 是否为 `algorithm` 对 `signed_content` 的签名
    pub fn verify(
        &self,
        verifier: &dyn SignatureVerifier,
        algorithm: SignatureAlgorithm,
        signed_content: &[u8],
        signature: &[u8],
    ) -> bool {
        if algorithm != self.algorithm {
            return false;
        }
        verifier.verify(algorithm, &self.key, signed_content, signature)
    }
}

/// basicConstraints 扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicConstraints {
    pub is_ca: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_len_constraint: Option<u32>,
}

/// keyUsage 扩展，以位掩码表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    pub const DIGITAL_SIGNATURE: u16 = 0x0080;
    pub const NON_REPUDIATION: u16 = 0x0040;
    pub const KEY_ENCIPHERMENT: u16 = 0x0020;
    pub const DATA_ENCIPHERMENT: u16 = 0x0010;
    pub const KEY_AGREEMENT: u16 = 0x0008;
    pub const KEY_CERT_SIGN: u16 = 0x0004;
    pub const CRL_SIGN: u16 = 0x0002;
    pub const ENCIPHER_ONLY: u16 = 0x0001;
    pub const DECIPHER_ONLY: u16 = 0x8000;

    const NAMES: [(u16, &'static str); 9] = [
        (Self::DIGITAL_SIGNATURE, "digitalSignature"),
        (Self::NON_REPUDIATION, "nonRepudiation"),
        (Self::KEY_ENCIPHERMENT, "keyEncipherment"),
        (Self::DATA_ENCIPHERMENT, "dataEncipherment"),
        (Self::KEY_AGREEMENT, "keyAgreement"),
        (Self::KEY_CERT_SIGN, "keyCertSign"),
        (Self::CRL_SIGN, "cRLSign"),
        (Self::ENCIPHER_ONLY, "encipherOnly"),
        (Self::DECIPHER_ONLY, "decipherOnly"),
    ];

    /// `flag` 的所有位均已设置
    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// `mask` 中至少有一位已设置
    pub fn intersects(&self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    /// 解析逗号分隔列表，例如 `cRLSign,keyCertSign`
    pub fn from_names(names: &str) -> Result<Self> {
        let mut bits = 0u16;
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let (bit, _) = Self::NAMES
                .iter()
                .find(|(_, known)| known.eq_ignore_ascii_case(name))
                .ok_or_else(|| PkiError::ParseError(format!("unknown key usage {name:?}")))?;
            bits |= bit;
        }
        Ok(Self(bits))
    }

    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.has(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

/// 引擎读取的证书扩展
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_constraints: Option<BasicConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<KeyUsage>,
    /// extendedKeyUsage 用途OID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_key_usage: Option<Vec<String>>,
}

/// 证书的签名主体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub version: u8,
    pub serial_number: SerialNumber,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub subject: Name,
    #[serde(with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub not_after: OffsetDateTime,
    pub public_key: PublicKey,
    #[serde(default)]
    pub extensions: Extensions,
}

impl CertificateInfo {
    /// 签名覆盖的规范字节
    pub fn to_signed_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PkiError::EncodingError(e.to_string()))
    }

    pub fn is_valid_at(&self, time: OffsetDateTime) -> bool {
        time >= self.not_before && time <= self.not_after
    }
}

/// 编解码器产出的不可变证书
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    info: CertificateInfo,
    signed_data: Vec<u8>,
    signature: Vec<u8>,
    fingerprint: String,
}

impl Certificate {
    /// 由解码后的主体、被签名的原始字节
    /// 以及对应签名组装证书。
    pub fn new(info: CertificateInfo, signed_data: Vec<u8>, signature: Vec<u8>) -> Self {
        let fingerprint = hex::encode(sha256_parts(&[&signed_data, &signature]));
        Self {
            info,
            signed_data,
            signature,
            fingerprint,
        }
    }

    pub fn info(&self) -> &CertificateInfo {
        &self.info
    }

    pub fn subject(&self) -> &Name {
        &self.info.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.info.issuer
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.info.serial_number
    }

    pub fn not_before(&self) -> OffsetDateTime {
        self.info.not_before
    }

    pub fn not_after(&self) -> OffsetDateTime {
        self.info.not_after
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.info.public_key
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.info.signature_algorithm
    }

    pub fn signed_data(&self) -> &[u8] {
        &self.signed_data
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// 签名内容与签名的SHA-256，小写十六进制
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn extensions(&self) -> &Extensions {
        &self.info.extensions
    }

    pub fn is_ca(&self) -> bool {
        self.info
            .extensions
            .basic_constraints
            .is_some_and(|bc| bc.is_ca)
    }

    pub fn path_len_constraint(&self) -> Option<u32> {
        self.info
            .extensions
            .basic_constraints
            .and_then(|bc| bc.path_len_constraint)
    }

    pub fn key_usage(&self) -> Option<KeyUsage> {
        self.info.extensions.key_usage
    }

    pub fn extended_key_usage(&self) -> Option<&[String]> {
        self.info.extensions.extended_key_usage.as_deref()
    }

    /// 主体名与颁发者名相同
    pub fn is_self_issued(&self) -> bool {
        self.info.subject == self.info.issuer
    }

    /// 自颁发且签名可用证书自身公钥验证
    pub fn is_self_signed(&self, verifier: &dyn SignatureVerifier) -> bool {
        self.is_self_issued() && self.is_signed_by(&self.info.public_key, verifier)
    }

    /// `issuer_key` 能否验证本证书的签名
    pub fn is_signed_by(&self, issuer_key: &PublicKey, verifier: &dyn SignatureVerifier) -> bool {
        issuer_key.verify(
            verifier,
            self.info.signature_algorithm,
            &self.signed_data,
            &self.signature,
        )
    }
}
