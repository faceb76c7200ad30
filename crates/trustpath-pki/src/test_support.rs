//! 共享测试夹具：两级CA层次结构及其终端实体证书
//! 和CRL，密钥由固定种子派生。

use time::{Duration, OffsetDateTime};
use trustpath_crypto::{DefaultVerifier, KeyPair, SignatureAlgorithm};

use crate::{
    ca::{public_key_of, Authority, CertificateParams, CrlParams},
    cert::{Certificate, KeyUsage, Name, PublicKey},
    config::VerifyConfig,
    status::crl::CertificateRevocationList,
    store::index::{CertificateIndex, CrlIndex},
    types::RevocationReason,
    verify::VerifyContext,
};

pub(crate) struct Fixture {
    pub now: OffsetDateTime,
    pub ca1: Certificate,
    pub ca2: Certificate,
    pub ee1: Certificate,
    pub ee2: Certificate,
    pub ee3: Certificate,
    pub crl1: CertificateRevocationList,
    pub crl1_2: CertificateRevocationList,
    pub crl2: CertificateRevocationList,
}

pub(crate) fn ca_usage() -> KeyUsage {
    KeyUsage(KeyUsage::CRL_SIGN | KeyUsage::KEY_CERT_SIGN)
}

pub(crate) fn ee_usage() -> KeyUsage {
    KeyUsage(KeyUsage::KEY_ENCIPHERMENT | KeyUsage::DIGITAL_SIGNATURE)
}

impl Fixture {
    pub fn new() -> Self {
        let now = OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
            .unwrap();
        let name = |cn: &str| Name::parse(&format!("/DC=org/DC=ruby-lang/CN={cn}")).unwrap();

        let ca1_params = CertificateParams::new(name("CA1"), 1u64, now, now + Duration::hours(1))
            .ca(None)
            .key_usage(ca_usage());
        let mut ca1 = Authority::new_root(keypair(1), ca1_params).unwrap();

        let ca2_params =
            CertificateParams::new(name("CA2"), 2u64, now, now + Duration::minutes(30))
                .ca(None)
                .key_usage(ca_usage());
        let mut ca2 = ca1.issue_intermediate(keypair(2), ca2_params).unwrap();

        let mut issue_ee = |cn: &str, seed: u8, serial: u64, from, until| {
            let params =
                CertificateParams::new(name(cn), serial, from, until).key_usage(ee_usage());
            ca2.issue(&public_key(seed), params).unwrap()
        };
        let ee1 = issue_ee("EE1", 10, 10, now, now + Duration::minutes(30));
        let ee2 = issue_ee("EE2", 20, 20, now, now + Duration::minutes(30));
        let ee3 = issue_ee(
            "EE2",
            20,
            30,
            now - Duration::seconds(100),
            now - Duration::seconds(1),
        );

        let window = |number| {
            CrlParams::new(now)
                .next_update(now + Duration::minutes(30))
                .crl_number(number)
        };
        let crl1 = ca1.issue_crl(window(1)).unwrap();
        let crl1_2 = ca1
            .issue_crl(window(2).revoke(2u64, now, Some(RevocationReason::KeyCompromise)))
            .unwrap();
        let crl2 = ca2
            .issue_crl(window(1).revoke(20u64, now, Some(RevocationReason::KeyCompromise)))
            .unwrap();

        Self {
            now,
            ca1: ca1.certificate().clone(),
            ca2: ca2.certificate().clone(),
            ee1,
            ee2,
            ee3,
            crl1,
            crl1_2,
            crl2,
        }
    }

    pub fn name(&self, cn: &str) -> Name {
        Name::parse(&format!("/DC=org/DC=ruby-lang/CN={cn}")).unwrap()
    }

    pub fn keypair(&self, seed: u8) -> KeyPair {
        keypair(seed)
    }

    pub fn public_key(&self, seed: u8) -> PublicKey {
        public_key(seed)
    }

    pub fn ca1_authority(&self) -> Authority {
        Authority::from_parts(keypair(1), self.ca1.clone()).unwrap()
    }

    pub fn ca2_authority(&self) -> Authority {
        Authority::from_parts(keypair(2), self.ca2.clone()).unwrap()
    }

    /// 使用CA2的名称但密钥不同
    pub fn impostor_ca2(&self) -> Certificate {
        let params = CertificateParams::new(
            self.name("CA2"),
            3u64,
            self.now,
            self.now + Duration::minutes(30),
        )
        .ca(None)
        .key_usage(ca_usage());
        self.ca1_authority().issue(&public_key(99), params).unwrap()
    }

    pub fn impostor_ca2_crl(&self) -> CertificateRevocationList {
        Authority::from_parts(keypair(99), self.impostor_ca2())
            .unwrap()
            .issue_crl(CrlParams::new(self.now).next_update(self.now + Duration::minutes(30)))
            .unwrap()
    }

    /// 由非CA的EE1签发的叶子证书，返回 `(leaf, ee1)`。
    pub fn issued_by_end_entity(&self) -> (Certificate, Certificate) {
        let params = CertificateParams::new(
            self.name("Below-EE1"),
            50u64,
            self.now,
            self.now + Duration::minutes(10),
        );
        let leaf = Authority::from_parts(keypair(10), self.ee1.clone())
            .unwrap()
            .issue(&public_key(50), params)
            .unwrap();
        (leaf, self.ee1.clone())
    }

    pub fn leaf_with_eku(&self, oids: Vec<String>) -> Certificate {
        let params = CertificateParams::new(
            self.name("EKU"),
            60u64,
            self.now,
            self.now + Duration::minutes(10),
        )
        .key_usage(ee_usage())
        .extended_key_usage(oids);
        self.ca2_authority().issue(&public_key(60), params).unwrap()
    }

    pub fn stores(&self, trusted: &[&Certificate], intermediates: &[&Certificate]) -> TestStores {
        let mut stores = TestStores {
            trusted: CertificateIndex::new(),
            intermediates: CertificateIndex::new(),
            crls: CrlIndex::new(),
            config: VerifyConfig::default(),
            verifier: DefaultVerifier,
            now: self.now,
        };
        for cert in trusted {
            stores.trusted.insert((*cert).clone());
        }
        for cert in intermediates {
            stores.intermediates.insert((*cert).clone());
        }
        stores
    }
}

/// 偶数种子生成P-256密钥，奇数种子生成Ed25519密钥
pub(crate) fn keypair(seed: u8) -> KeyPair {
    let algorithm = if seed % 2 == 0 {
        SignatureAlgorithm::EcdsaP256Sha256
    } else {
        SignatureAlgorithm::Ed25519
    };
    KeyPair::from_seed(algorithm, &[seed; 32]).unwrap()
}

pub(crate) fn public_key(seed: u8) -> PublicKey {
    public_key_of(&keypair(seed))
}

/// [`VerifyContext`] 背后持有的状态
pub(crate) struct TestStores {
    pub trusted: CertificateIndex,
    pub intermediates: CertificateIndex,
    pub crls: CrlIndex,
    pub config: VerifyConfig,
    pub verifier: DefaultVerifier,
    pub now: OffsetDateTime,
}

impl TestStores {
    pub fn context<'a>(&'a self, untrusted: &'a [Certificate]) -> VerifyContext<'a> {
        VerifyContext {
            trusted: &self.trusted,
            intermediates: &self.intermediates,
            crls: &self.crls,
            untrusted,
            config: &self.config,
            verifier: &self.verifier,
            now: self.now,
        }
    }
}
