pub mod inspect;
pub mod verify;

#[cfg(test)]
pub(crate) mod tests {
    use time::{Duration, OffsetDateTime};
    use trustpath_crypto::{KeyPair, SignatureAlgorithm};
    use trustpath_pki::{
        ca::public_key_of, Authority, Certificate, CertificateParams, CertificateRevocationList,
        CrlParams, KeyUsage, Name,
    };

    pub struct Hierarchy {
        pub root: Certificate,
        pub intermediate: Certificate,
        pub leaf: Certificate,
        pub crl: CertificateRevocationList,
    }

    fn name(cn: &str) -> Name {
        Name::new().with("O", "trustpath").with("CN", cn)
    }

    /// 根 -> 中间CA -> 叶子，外加中间CA签发的空CRL
    pub fn hierarchy() -> Hierarchy {
        let now = OffsetDateTime::now_utc();
        let ca_usage = KeyUsage(KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN);

        let root_key = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[1; 32]).unwrap();
        let params = CertificateParams::new(name("Root"), 1u64, now, now + Duration::days(1))
            .ca(None)
            .key_usage(ca_usage);
        let mut root = Authority::new_root(root_key, params).unwrap();

        let sub_key = KeyPair::from_seed(SignatureAlgorithm::EcdsaP256Sha256, &[2; 32]).unwrap();
        let params = CertificateParams::new(name("Sub"), 2u64, now, now + Duration::days(1))
            .ca(Some(0))
            .key_usage(ca_usage);
        let mut sub = root.issue_intermediate(sub_key, params).unwrap();

        let leaf_key = KeyPair::from_seed(SignatureAlgorithm::Ed25519, &[3; 32]).unwrap();
        let params = CertificateParams::new(name("Leaf"), 3u64, now, now + Duration::hours(1))
            .key_usage(KeyUsage(KeyUsage::DIGITAL_SIGNATURE));
        let leaf = sub.issue(&public_key_of(&leaf_key), params).unwrap();

        let crl = sub
            .issue_crl(CrlParams::new(now).next_update(now + Duration::hours(1)))
            .unwrap();

        Hierarchy {
            root: root.certificate().clone(),
            intermediate: sub.certificate().clone(),
            leaf,
            crl,
        }
    }
}
