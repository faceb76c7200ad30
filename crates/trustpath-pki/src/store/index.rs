use std::collections::{HashMap, HashSet};

use crate::{cert::Certificate, cert::Name, status::crl::CertificateRevocationList};

/// 按主体名称索引的证书，按指纹去重。
/// 同一主体的候选证书按插入顺序返回。
#[derive(Debug, Clone, Default)]
pub struct CertificateIndex {
    by_subject: HashMap<Name, Vec<Certificate>>,
    fingerprints: HashSet<String>,
    len: usize,
}

impl CertificateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已存在相同证书时返回 `false`
    pub fn insert(&mut self, cert: Certificate) -> bool {
        if !self.fingerprints.insert(cert.fingerprint().to_string()) {
            return false;
        }
        self.by_subject
            .entry(cert.subject().clone())
            .or_default()
            .push(cert);
        self.len += 1;
        true
    }

    pub fn by_subject(&self, subject: &Name) -> &[Certificate] {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, cert: &Certificate) -> bool {
        self.fingerprints.contains(cert.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.by_subject.values().flatten()
    }
}

/// 按颁发者名称索引的CRL
#[derive(Debug, Clone, Default)]
pub struct CrlIndex {
    by_issuer: HashMap<Name, Vec<CertificateRevocationList>>,
    fingerprints: HashSet<String>,
}

impl CrlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, crl: CertificateRevocationList) -> bool {
        if !self.fingerprints.insert(crl.fingerprint().to_string()) {
            return false;
        }
        self.by_issuer
            .entry(crl.issuer().clone())
            .or_default()
            .push(crl);
        true
    }

    pub fn by_issuer(&self, issuer: &Name) -> &[CertificateRevocationList] {
        self.by_issuer
            .get(issuer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn test_insert_deduplicates() {
        let fx = Fixture::new();
        let mut index = CertificateIndex::new();
        assert!(index.insert(fx.ca1.clone()));
        assert!(!index.insert(fx.ca1.clone()));
        assert!(index.insert(fx.ca2.clone()));
        assert_eq!(index.len(), 2);
        assert!(index.contains(&fx.ca2));
        assert!(!index.contains(&fx.ee1));
        assert_eq!(index.by_subject(fx.ca1.subject()), &[fx.ca1.clone()]);
        assert!(index.by_subject(fx.ee1.subject()).is_empty());
    }

    #[test]
    fn test_crl_index_groups_by_issuer() {
        let fx = Fixture::new();
        let mut index = CrlIndex::new();
        assert!(index.insert(fx.crl1.clone()));
        assert!(index.insert(fx.crl1_2.clone()));
        assert!(!index.insert(fx.crl1.clone()));
        assert!(index.insert(fx.crl2.clone()));
        assert_eq!(index.len(), 3);
        assert_eq!(index.by_issuer(fx.ca1.subject()).len(), 2);
        assert_eq!(index.by_issuer(fx.ca2.subject()).len(), 1);
    }
}
