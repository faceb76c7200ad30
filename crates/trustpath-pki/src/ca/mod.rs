//! 证书机构辅助工具
//!
//! 签发自签名根证书、中间CA证书、终端实体证书以及CRL。
//! 用于生成测试夹具，也供需要构建测试PKI的调用方使用。

use time::OffsetDateTime;
use trustpath_crypto::KeyPair;

use crate::{
    cert::{
        BasicConstraints, Certificate, CertificateInfo, Extensions, KeyUsage, Name, PublicKey,
        SerialNumber,
    },
    error::{PkiError, Result as PkiResult},
    status::crl::{CertificateRevocationList, CrlInfo, RevocationEntry},
    types::RevocationReason,
};

/// 待签发证书的字段
#[derive(Debug, Clone)]
pub struct CertificateParams {
    pub subject: Name,
    pub serial_number: SerialNumber,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub basic_constraints: Option<BasicConstraints>,
    pub key_usage: Option<KeyUsage>,
    pub extended_key_usage: Option<Vec<String>>,
}

impl CertificateParams {
    pub fn new(
        subject: Name,
        serial_number: impl Into<SerialNumber>,
        not_before: OffsetDateTime,
        not_after: OffsetDateTime,
    ) -> Self {
        Self {
            subject,
            serial_number: serial_number.into(),
            not_before,
            not_after,
            basic_constraints: None,
            key_usage: None,
            extended_key_usage: None,
        }
    }

    /// 标记为CA，可选路径长度约束
    pub fn ca(mut self, path_len_constraint: Option<u32>) -> Self {
        self.basic_constraints = Some(BasicConstraints {
            is_ca: true,
            path_len_constraint,
        });
        self
    }

    pub fn key_usage(mut self, key_usage: KeyUsage) -> Self {
        self.key_usage = Some(key_usage);
        self
    }

    pub fn extended_key_usage(mut self, oids: Vec<String>) -> Self {
        self.extended_key_usage = Some(oids);
        self
    }

    fn extensions(&self) -> Extensions {
        Extensions {
            basic_constraints: self.basic_constraints,
            key_usage: self.key_usage,
            extended_key_usage: self.extended_key_usage.clone(),
        }
    }

    fn into_info(
        self,
        issuer: Name,
        issuer_key: &KeyPair,
        subject_key: PublicKey,
    ) -> PkiResult<CertificateInfo> {
        if self.not_after < self.not_before {
            return Err(PkiError::InvalidInput(
                "not_after precedes not_before".to_string(),
            ));
        }
        let extensions = self.extensions();
        Ok(CertificateInfo {
            version: 3,
            serial_number: self.serial_number,
            signature_algorithm: issuer_key.algorithm(),
            issuer,
            subject: self.subject,
            not_before: self.not_before,
            not_after: self.not_after,
            public_key: subject_key,
            extensions,
        })
    }
}

/// 待签发CRL的字段
#[derive(Debug, Clone)]
pub struct CrlParams {
    pub this_update: OffsetDateTime,
    pub next_update: Option<OffsetDateTime>,
    pub crl_number: Option<u64>,
    pub revoked: Vec<RevocationEntry>,
}

impl CrlParams {
    pub fn new(this_update: OffsetDateTime) -> Self {
        Self {
            this_update,
            next_update: None,
            crl_number: None,
            revoked: Vec::new(),
        }
    }

    pub fn next_update(mut self, next_update: OffsetDateTime) -> Self {
        self.next_update = Some(next_update);
        self
    }

    pub fn crl_number(mut self, crl_number: u64) -> Self {
        self.crl_number = Some(crl_number);
        self
    }

    pub fn revoke(
        mut self,
        serial_number: impl Into<SerialNumber>,
        revocation_date: OffsetDateTime,
        reason: Option<RevocationReason>,
    ) -> Self {
        self.revoked.push(RevocationEntry {
            serial_number: serial_number.into(),
            revocation_date,
            reason,
        });
        self
    }
}

/// 证书中携带的公钥部分
pub fn public_key_of(keypair: &KeyPair) -> PublicKey {
    PublicKey::new(keypair.algorithm(), keypair.public_key_bytes())
}

/// 签名证书主体
pub fn sign_certificate(info: CertificateInfo, issuer_key: &KeyPair) -> PkiResult<Certificate> {
    if info.signature_algorithm != issuer_key.algorithm() {
        return Err(PkiError::CAError(format!(
            "signature algorithm {} does not match issuer key {}",
            info.signature_algorithm,
            issuer_key.algorithm()
        )));
    }
    let signed_data = info.to_signed_bytes()?;
    let signature = issuer_key.sign(&signed_data);
    Ok(Certificate::new(info, signed_data, signature))
}

/// 签名CRL主体
pub fn sign_crl(info: CrlInfo, issuer_key: &KeyPair) -> PkiResult<CertificateRevocationList> {
    if info.signature_algorithm != issuer_key.algorithm() {
        return Err(PkiError::CAError(format!(
            "signature algorithm {} does not match issuer key {}",
            info.signature_algorithm,
            issuer_key.algorithm()
        )));
    }
    let signed_data = info.to_signed_bytes()?;
    let signature = issuer_key.sign(&signed_data);
    Ok(CertificateRevocationList::new(info, signed_data, signature))
}

/// 证书机构
pub struct Authority {
    keypair: KeyPair,
    certificate: Certificate,
    issued_count: u64,
}

impl Authority {
    /// 创建自签名根CA
    pub fn new_root(keypair: KeyPair, params: CertificateParams) -> PkiResult<Self> {
        let subject = params.subject.clone();
        let info = params.into_info(subject, &keypair, public_key_of(&keypair))?;
        let certificate = sign_certificate(info, &keypair)?;
        Ok(Self {
            keypair,
            certificate,
            issued_count: 0,
        })
    }

    /// 包装已有证书及其密钥对
    pub fn from_parts(keypair: KeyPair, certificate: Certificate) -> PkiResult<Self> {
        if certificate.public_key() != &public_key_of(&keypair) {
            return Err(PkiError::CAError(
                "key pair does not match certificate public key".to_string(),
            ));
        }
        Ok(Self {
            keypair,
            certificate,
            issued_count: 0,
        })
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    pub fn issued_count(&self) -> u64 {
        self.issued_count
    }

    /// 为 `subject_key` 签发证书
    pub fn issue(
        &mut self,
        subject_key: &PublicKey,
        params: CertificateParams,
    ) -> PkiResult<Certificate> {
        let info = params.into_info(
            self.certificate.subject().clone(),
            &self.keypair,
            subject_key.clone(),
        )?;
        let certificate = sign_certificate(info, &self.keypair)?;
        self.issued_count += 1;
        Ok(certificate)
    }

    /// 签发持有 `keypair` 的下级CA
    pub fn issue_intermediate(
        &mut self,
        keypair: KeyPair,
        params: CertificateParams,
    ) -> PkiResult<Authority> {
        if !params.basic_constraints.is_some_and(|bc| bc.is_ca) {
            return Err(PkiError::CAError(
                "intermediate certificate must have CA:true".to_string(),
            ));
        }
        let certificate = self.issue(&public_key_of(&keypair), params)?;
        Ok(Authority {
            keypair,
            certificate,
            issued_count: 0,
        })
    }

    /// 以本机构名称签发CRL
    pub fn issue_crl(&self, params: CrlParams) -> PkiResult<CertificateRevocationList> {
        let info = CrlInfo {
            version: 2,
            signature_algorithm: self.keypair.algorithm(),
            issuer: self.certificate.subject().clone(),
            this_update: params.this_update,
            next_update: params.next_update,
            crl_number: params.crl_number,
            revoked_certificates: params.revoked,
        };
        sign_crl(info, &self.keypair)
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;
    use trustpath_crypto::{DefaultVerifier, SignatureAlgorithm};

    use super::*;

    fn root() -> Authority {
        let now = OffsetDateTime::now_utc();
        let keypair = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[7; 32]).unwrap();
        let params = CertificateParams::new(
            "/CN=Root".parse().unwrap(),
            1u64,
            now,
            now + Duration::days(1),
        )
        .ca(None);
        Authority::new_root(keypair, params).unwrap()
    }

    #[test]
    fn test_root_is_self_signed() {
        let root = root();
        assert!(root.certificate().is_self_signed(&DefaultVerifier));
        assert!(root.certificate().is_ca());
    }

    #[test]
    fn test_issue_counts_and_signs() {
        let mut root = root();
        let now = OffsetDateTime::now_utc();
        let leaf_key = KeyPair::from_seed(SignatureAlgorithm::EcdsaP256Sha256, &[8; 32]).unwrap();
        let params = CertificateParams::new(
            "/CN=Leaf".parse().unwrap(),
            2u64,
            now,
            now + Duration::hours(1),
        );
        let leaf = root.issue(&public_key_of(&leaf_key), params).unwrap();
        assert_eq!(root.issued_count(), 1);
        assert_eq!(leaf.issuer(), root.certificate().subject());
        assert!(leaf.is_signed_by(root.certificate().public_key(), &DefaultVerifier));
        assert_eq!(leaf.public_key().algorithm, SignatureAlgorithm::EcdsaP256Sha256);
    }

    #[test]
    fn test_intermediate_requires_ca() {
        let mut root = root();
        let now = OffsetDateTime::now_utc();
        let keypair = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[9; 32]).unwrap();
        let params = CertificateParams::new(
            "/CN=Sub".parse().unwrap(),
            3u64,
            now,
            now + Duration::hours(1),
        );
        assert!(matches!(
            root.issue_intermediate(keypair, params),
            Err(PkiError::CAError(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_foreign_key() {
        let root = root();
        let other = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[10; 32]).unwrap();
        assert!(Authority::from_parts(other, root.certificate().clone()).is_err());
    }

    #[test]
    fn test_invalid_validity_window() {
        let now = OffsetDateTime::now_utc();
        let keypair = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[11; 32]).unwrap();
        let params = CertificateParams::new(
            "/CN=Bad".parse().unwrap(),
            1u64,
            now,
            now - Duration::hours(1),
        );
        assert!(matches!(
            Authority::new_root(keypair, params),
            Err(PkiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_issue_crl() {
        let root = root();
        let now = OffsetDateTime::now_utc();
        let crl = root
            .issue_crl(CrlParams::new(now).crl_number(4).revoke(9u64, now, None))
            .unwrap();
        assert_eq!(crl.issuer(), root.certificate().subject());
        assert_eq!(crl.crl_number(), Some(4));
        assert!(crl.is_revoked(&SerialNumber::from(9)));
        assert!(crl.is_signed_by(root.certificate().public_key(), &DefaultVerifier));
    }
}
