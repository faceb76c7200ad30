use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{cert::KeyUsage, error::PkiError};

/// anyExtendedKeyUsage 的OID
pub const ANY_EXTENDED_KEY_USAGE: &str = "2.5.29.37.0";

/// 验证证书链的预期用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// 不强制密钥用途
    #[default]
    Any,
    /// TLS客户端认证
    SslClient,
    /// TLS服务器认证
    SslServer,
    /// S/MIME签名
    SmimeSign,
    /// S/MIME加密
    SmimeEncrypt,
    /// CRL签名
    CrlSign,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Purpose::Any,
        Purpose::SslClient,
        Purpose::SslServer,
        Purpose::SmimeSign,
        Purpose::SmimeEncrypt,
        Purpose::CrlSign,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Purpose::Any => "any",
            Purpose::SslClient => "sslclient",
            Purpose::SslServer => "sslserver",
            Purpose::SmimeSign => "smimesign",
            Purpose::SmimeEncrypt => "smimeencrypt",
            Purpose::CrlSign => "crlsign",
        }
    }

    /// 叶子证书必须至少携带其中一位的密钥用途。
    /// `None` 表示不强制密钥用途。
    pub fn leaf_key_usage(&self) -> Option<u16> {
        match self {
            Purpose::Any => None,
            Purpose::SslClient => Some(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT),
            Purpose::SslServer => Some(
                KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT | KeyUsage::KEY_AGREEMENT,
            ),
            Purpose::SmimeSign => Some(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::NON_REPUDIATION),
            Purpose::SmimeEncrypt => Some(KeyUsage::KEY_ENCIPHERMENT),
            Purpose::CrlSign => Some(KeyUsage::CRL_SIGN),
        }
    }

    /// 叶子证书携带该扩展时必须列出的扩展密钥用途OID
    pub fn extended_key_usage(&self) -> Option<&'static str> {
        match self {
            Purpose::SslServer => Some("1.3.6.1.5.5.7.3.1"),
            Purpose::SslClient => Some("1.3.6.1.5.5.7.3.2"),
            Purpose::SmimeSign | Purpose::SmimeEncrypt => Some("1.3.6.1.5.5.7.3.4"),
            Purpose::Any | Purpose::CrlSign => None,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Purpose {
    type Err = PkiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', '-'], "");
        Purpose::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| PkiError::UnknownPurpose(s.to_string()))
    }
}

/// 验证标志，可用 `|` 组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifyFlags(pub u32);

impl VerifyFlags {
    pub const NONE: VerifyFlags = VerifyFlags(0);
    /// 根据颁发者的CRL检查叶子证书
    pub const CRL_CHECK: VerifyFlags = VerifyFlags(0x4);
    /// 配合 `CRL_CHECK`，检查根以下的每张证书
    pub const CRL_CHECK_ALL: VerifyFlags = VerifyFlags(0x8);
    /// 接受非自签名的受信任证书作为链终点
    pub const PARTIAL_CHAIN: VerifyFlags = VerifyFlags(0x80000);
    /// 跳过证书和CRL的有效期检查
    pub const NO_CHECK_TIME: VerifyFlags = VerifyFlags(0x200000);

    pub fn contains(&self, other: VerifyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 撤销检查是否覆盖整条链
    pub fn check_all_crls(&self) -> bool {
        self.contains(Self::CRL_CHECK) && self.contains(Self::CRL_CHECK_ALL)
    }
}

impl BitOr for VerifyFlags {
    type Output = VerifyFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        VerifyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for VerifyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// 撤销原因代码（RFC 5280 §5.3.1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    #[serde(rename = "cACompromise")]
    CACompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    /// 增量CRL标记：该序列号不再被撤销
    #[serde(rename = "removeFromCRL")]
    RemoveFromCRL,
    PrivilegeWithdrawn,
    #[serde(rename = "aACompromise")]
    AACompromise,
}
