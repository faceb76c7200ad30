//! Trustpath PKI - 证书链验证
//!
//! 基于签名信封证书和CRL的信任存储、路径构建、
//! 证书链验证以及CRL撤销检查。

pub mod ca;
pub mod cert;
pub mod chain;
pub mod codec;
pub mod config;
pub mod error;
pub mod status;
pub mod store;
pub mod types;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出常用类型
pub use ca::{Authority, CertificateParams, CrlParams};
pub use cert::{
    BasicConstraints, Certificate, CertificateInfo, Extensions, KeyUsage, Name, PublicKey,
    SerialNumber,
};
pub use codec::{
    encode_certificate, encode_certificates, encode_crl, parse_certificate, parse_certificates,
    parse_crl, parse_crls,
};
pub use config::VerifyConfig;
pub use error::{PkiError, Result};
pub use status::crl::{CertificateRevocationList, CrlInfo, RevocationEntry};
pub use store::TrustStore;
pub use types::{Purpose, RevocationReason, VerifyFlags};
pub use verify::{VerificationResult, VerifyCode};

/// 常用类型预导入
pub mod prelude {
    pub use crate::{
        ca::{Authority, CertificateParams, CrlParams},
        cert::{Certificate, KeyUsage, Name},
        config::VerifyConfig,
        error::{PkiError, Result},
        status::crl::CertificateRevocationList,
        store::TrustStore,
        types::{Purpose, VerifyFlags},
        verify::{VerificationResult, VerifyCode},
    };
}
