use std::fmt;

use serde::Serialize;

use crate::cert::Certificate;

/// 验证结果代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyCode {
    #[default]
    Ok,
    InvalidInput,
    ChainIncomplete,
    InvalidSignature,
    CertificateNotYetValid,
    CertificateExpired,
    InvalidCa,
    PurposeMismatch,
    UnableToGetCrl,
    CertificateRevoked,
}

impl VerifyCode {
    /// 该代码的默认消息
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyCode::Ok => "ok",
            VerifyCode::InvalidInput => "invalid or malformed certificate",
            VerifyCode::ChainIncomplete => "unable to get local issuer certificate",
            VerifyCode::InvalidSignature => "certificate signature failure",
            VerifyCode::CertificateNotYetValid => "certificate is not yet valid",
            VerifyCode::CertificateExpired => "certificate has expired",
            VerifyCode::InvalidCa => "invalid CA certificate",
            VerifyCode::PurposeMismatch => "unsupported certificate purpose",
            VerifyCode::UnableToGetCrl => "unable to get certificate CRL",
            VerifyCode::CertificateRevoked => "certificate revoked",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == VerifyCode::Ok
    }
}

impl fmt::Display for VerifyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 包含解析出的证书链（叶子在前）的验证结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub code: VerifyCode,
    pub message: String,
    /// 失败证书在 `chain` 中的索引
    pub depth: Option<usize>,
    pub chain: Vec<Certificate>,
}

impl VerificationResult {
    pub fn ok(chain: Vec<Certificate>) -> Self {
        Self {
            code: VerifyCode::Ok,
            message: VerifyCode::Ok.as_str().to_string(),
            depth: None,
            chain,
        }
    }

    pub(crate) fn failed(failure: Failure, chain: Vec<Certificate>) -> Self {
        Self {
            code: failure.code,
            message: failure.message,
            depth: failure.depth,
            chain,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

impl Default for VerificationResult {
    fn default() -> Self {
        Self::ok(Vec::new())
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth {
            Some(depth) => write!(f, "{} at depth {depth}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// 一次失败的检查
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub code: VerifyCode,
    pub depth: Option<usize>,
    pub message: String,
}

impl Failure {
    pub fn new(code: VerifyCode, depth: usize) -> Self {
        Self {
            code,
            depth: Some(depth),
            message: code.as_str().to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
