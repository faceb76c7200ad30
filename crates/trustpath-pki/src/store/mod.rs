//! 信任存储
//!
//! 保存信任锚、补充中间证书、CRL和验证配置，
//! 并基于它们执行验证。

pub mod index;

use std::{fs, path::Path};

use time::OffsetDateTime;
use tracing::debug;
use trustpath_crypto::{DefaultVerifier, SignatureVerifier};

use self::index::{CertificateIndex, CrlIndex};
use crate::{
    cert::Certificate,
    codec,
    config::VerifyConfig,
    error::Result as PkiResult,
    status::crl::CertificateRevocationList,
    types::{Purpose, VerifyFlags},
    verify::{verify_certificate, VerificationResult, VerifyCode, VerifyContext},
};

/// 证书信任存储
pub struct TrustStore {
    trusted: CertificateIndex,
    intermediates: CertificateIndex,
    crls: CrlIndex,
    config: VerifyConfig,
    verifier: Box<dyn SignatureVerifier>,
    last: Option<VerificationResult>,
}

impl Default for TrustStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("trusted", &self.trusted.len())
            .field("intermediates", &self.intermediates.len())
            .field("crls", &self.crls.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TrustStore {
    /// 使用默认签名验证器的空存储
    pub fn new() -> Self {
        Self::with_verifier(Box::new(DefaultVerifier))
    }

    pub fn with_verifier(verifier: Box<dyn SignatureVerifier>) -> Self {
        Self {
            trusted: CertificateIndex::new(),
            intermediates: CertificateIndex::new(),
            crls: CrlIndex::new(),
            config: VerifyConfig::default(),
            verifier,
            last: None,
        }
    }

    pub fn with_config(mut self, config: VerifyConfig) -> Self {
        self.config = config;
        self
    }

    /// 添加信任锚，此处不检查证书内容。
    pub fn add_cert(&mut self, cert: Certificate) -> bool {
        debug!(subject = %cert.subject(), "adding trusted certificate");
        self.trusted.insert(cert)
    }

    /// 添加可用于路径构建的不可信证书
    pub fn add_intermediate(&mut self, cert: Certificate) -> bool {
        self.intermediates.insert(cert)
    }

    pub fn add_crl(&mut self, crl: CertificateRevocationList) -> bool {
        debug!(issuer = %crl.issuer(), "adding CRL");
        self.crls.insert(crl)
    }

    /// 将证书包加载为信任锚。
    /// 返回新增证书的数量。
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> PkiResult<usize> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut added = 0;
        for cert in codec::parse_certificates(&contents)? {
            if self.add_cert(cert) {
                added += 1;
            }
        }
        debug!(path = %path.as_ref().display(), added, "loaded certificate file");
        Ok(added)
    }

    /// 加载CRL包
    pub fn add_crl_file<P: AsRef<Path>>(&mut self, path: P) -> PkiResult<usize> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut added = 0;
        for crl in codec::parse_crls(&contents)? {
            if self.add_crl(crl) {
                added += 1;
            }
        }
        debug!(path = %path.as_ref().display(), added, "loaded CRL file");
        Ok(added)
    }

    pub fn trusted_count(&self) -> usize {
        self.trusted.len()
    }

    pub fn intermediate_count(&self) -> usize {
        self.intermediates.len()
    }

    pub fn crl_count(&self) -> usize {
        self.crls.len()
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: VerifyConfig) {
        self.config = config;
    }

    pub fn purpose(&self) -> Purpose {
        self.config.purpose
    }

    pub fn set_purpose(&mut self, purpose: Purpose) {
        self.config.purpose = purpose;
    }

    pub fn flags(&self) -> VerifyFlags {
        self.config.flags
    }

    pub fn set_flags(&mut self, flags: VerifyFlags) {
        self.config.flags = flags;
    }

    /// 固定验证时间；`None` 表示当前时间
    pub fn set_time(&mut self, time: Option<OffsetDateTime>) {
        self.config.verification_time = time;
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.config.max_depth = max_depth;
    }

    /// 验证 `target`，不修改缓存结果
    pub fn check(&self, target: &Certificate, untrusted: &[Certificate]) -> VerificationResult {
        let ctx = VerifyContext {
            trusted: &self.trusted,
            intermediates: &self.intermediates,
            crls: &self.crls,
            untrusted,
            config: &self.config,
            verifier: self.verifier.as_ref(),
            now: self.config.effective_time(),
        };
        verify_certificate(&ctx, target)
    }

    /// 验证 `target` 并记住结果
    pub fn verify(
        &mut self,
        target: &Certificate,
        untrusted: &[Certificate],
    ) -> VerificationResult {
        let result = self.check(target, untrusted);
        self.last = Some(result.clone());
        result
    }

    pub fn last_result(&self) -> Option<&VerificationResult> {
        self.last.as_ref()
    }

    /// 上次验证的结果代码，尚未验证时为 `Ok`
    pub fn error(&self) -> VerifyCode {
        self.last.as_ref().map_or(VerifyCode::Ok, |r| r.code)
    }

    pub fn error_string(&self) -> &str {
        match &self.last {
            Some(result) => &result.message,
            None => VerifyCode::Ok.as_str(),
        }
    }

    pub fn error_depth(&self) -> Option<usize> {
        self.last.as_ref().and_then(|r| r.depth)
    }

    /// 上次验证构建的证书链，叶子在前
    pub fn chain(&self) -> &[Certificate] {
        self.last
            .as_ref()
            .map(|r| r.chain.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn test_fresh_store_accessors() {
        let store = TrustStore::new();
        assert_eq!(store.error(), VerifyCode::Ok);
        assert_eq!(store.error_string(), "ok");
        assert_eq!(store.error_depth(), None);
        assert!(store.chain().is_empty());
        assert!(store.last_result().is_none());
    }

    #[test]
    fn test_empty_store_rejects() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        assert!(!store.verify(&fx.ca1, &[]).is_ok());
        assert_eq!(store.error(), VerifyCode::ChainIncomplete);
        assert!(!store.verify(&fx.ca2, &[]).is_ok());
        assert_ne!(store.error(), VerifyCode::Ok);
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        assert!(store.add_cert(fx.ca1.clone()));
        assert!(!store.add_cert(fx.ca1.clone()));
        assert_eq!(store.trusted_count(), 1);
    }

    #[test]
    fn test_check_does_not_cache() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        let result = store.check(&fx.ee1, &[]);
        assert_eq!(result.code, VerifyCode::ChainIncomplete);
        assert!(store.last_result().is_none());
        assert_eq!(store.error_string(), "ok");
    }

    #[test]
    fn test_intermediates_are_searched() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        store.add_intermediate(fx.ca2.clone());
        assert!(store.verify(&fx.ee1, &[]).is_ok());
        assert_eq!(store.chain().len(), 3);
    }

    #[test]
    fn test_malformed_target() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        let unsigned = Certificate::new(
            fx.ee1.info().clone(),
            fx.ee1.signed_data().to_vec(),
            Vec::new(),
        );
        let result = store.verify(&unsigned, &[]);
        assert_eq!(result.code, VerifyCode::InvalidInput);
        assert!(store.chain().is_empty());
    }

    #[test]
    fn test_fixed_time() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        store.add_cert(fx.ca2.clone());
        assert!(store.verify(&fx.ee1, &[]).is_ok());

        store.set_time(Some(fx.now + Duration::hours(2)));
        assert_eq!(
            store.verify(&fx.ee1, &[]).code,
            VerifyCode::CertificateExpired
        );
        store.set_time(Some(fx.now - Duration::minutes(1)));
        assert_eq!(
            store.verify(&fx.ee1, &[]).code,
            VerifyCode::CertificateNotYetValid
        );
        store.set_time(None);
        assert!(store.verify(&fx.ee1, &[]).is_ok());
    }

    #[test]
    fn test_add_files() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let certs = dir.path().join("anchors.json");
        let crls = dir.path().join("crls.json");
        let bundle = codec::encode_certificates(&[fx.ca1.clone(), fx.ca2.clone()]).unwrap();
        fs::write(&certs, bundle).unwrap();
        fs::write(&crls, codec::encode_crl(&fx.crl2).unwrap()).unwrap();

        let mut store = TrustStore::new();
        assert_eq!(store.add_file(&certs).unwrap(), 2);
        assert_eq!(store.add_file(&certs).unwrap(), 0);
        assert_eq!(store.add_crl_file(&crls).unwrap(), 1);
        assert_eq!(store.crl_count(), 1);
        assert!(store.add_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_every_crl_from_issuer_is_consulted() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        store.set_flags(VerifyFlags::CRL_CHECK);
        store.add_crl(fx.crl1.clone());
        assert!(store.verify(&fx.ca2, &[]).is_ok());

        // crl1 未列出CA2，crl1_2 列出
        store.add_crl(fx.crl1_2.clone());
        assert_eq!(store.crl_count(), 2);
        let result = store.verify(&fx.ca2, &[]);
        assert_eq!(result.code, VerifyCode::CertificateRevoked);
        assert_eq!(result.depth, Some(0));
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        let fx = Fixture::new();
        let mut store = TrustStore::new();
        store.add_cert(fx.ca1.clone());
        store.add_cert(fx.ca2.clone());
        let store = std::sync::Arc::new(store);
        let handles: Vec<_> = [fx.ee1.clone(), fx.ee2.clone()]
            .into_iter()
            .map(|cert| {
                let store = store.clone();
                std::thread::spawn(move || store.check(&cert, &[]).is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
