use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use trustpath_crypto::{hash::sha256_parts, SignatureAlgorithm, SignatureVerifier};

use crate::{
    cert::{Name, PublicKey, SerialNumber},
    error::{PkiError, Result as PkiResult},
    types::RevocationReason,
};

/// 撤销条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    pub serial_number: SerialNumber,
    #[serde(with = "time::serde::rfc3339")]
    pub revocation_date: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RevocationReason>,
}

/// CRL的签名主体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlInfo {
    pub version: u8,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    #[serde(with = "time::serde::rfc3339")]
    pub this_update: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_update: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_number: Option<u64>,
    #[serde(default)]
    pub revoked_certificates: Vec<RevocationEntry>,
}

impl CrlInfo {
    pub fn to_signed_bytes(&self) -> PkiResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PkiError::EncodingError(e.to_string()))
    }
}

/// 证书撤销列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRevocationList {
    info: CrlInfo,
    signed_data: Vec<u8>,
    signature: Vec<u8>,
    fingerprint: String,
}

impl CertificateRevocationList {
    pub fn new(info: CrlInfo, signed_data: Vec<u8>, signature: Vec<u8>) -> Self {
        let fingerprint = hex::encode(sha256_parts(&[&signed_data, &signature]));
        Self {
            info,
            signed_data,
            signature,
            fingerprint,
        }
    }

    pub fn info(&self) -> &CrlInfo {
        &self.info
    }

    pub fn issuer(&self) -> &Name {
        &self.info.issuer
    }

    pub fn this_update(&self) -> OffsetDateTime {
        self.info.this_update
    }

    pub fn next_update(&self) -> Option<OffsetDateTime> {
        self.info.next_update
    }

    pub fn crl_number(&self) -> Option<u64> {
        self.info.crl_number
    }

    pub fn revoked_certificates(&self) -> &[RevocationEntry] {
        &self.info.revoked_certificates
    }

    pub fn signed_data(&self) -> &[u8] {
        &self.signed_data
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// 列出 `serial_number` 的条目（如有）
    pub fn get_revocation_info(&self, serial_number: &SerialNumber) -> Option<&RevocationEntry> {
        self.info
            .revoked_certificates
            .iter()
            .find(|entry| &entry.serial_number == serial_number)
    }

    /// 检查序列号是否被撤销。标记为
    /// `removeFromCRL` 的条目不计入。
    pub fn is_revoked(&self, serial_number: &SerialNumber) -> bool {
        self.get_revocation_info(serial_number)
            .is_some_and(|entry| entry.reason != Some(RevocationReason::RemoveFromCRL))
    }

    /// `this_update <= time`，且存在 `next_update` 时 `time <= next_update`
    pub fn is_current_at(&self, time: OffsetDateTime) -> bool {
        time >= self.info.this_update && self.info.next_update.map_or(true, |next| time <= next)
    }

    pub fn is_signed_by(&self, issuer_key: &PublicKey, verifier: &dyn SignatureVerifier) -> bool {
        issuer_key.verify(
            verifier,
            self.info.signature_algorithm,
            &self.signed_data,
            &self.signature,
        )
    }
}
