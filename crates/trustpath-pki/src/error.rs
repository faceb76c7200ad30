use thiserror::Error;

/// PKI模块错误类型
///
/// 验证失败不通过此类型报告，而是由
/// [`crate::verify::VerificationResult`] 携带。`PkiError` 覆盖
/// 编解码、文件加载和签发路径。
#[derive(Error, Debug)]
pub enum PkiError {
    /// 证书或CRL输入格式错误
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 生成编码证书或CRL失败
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// 可分辨名称格式错误
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// 调用方提供的参数不一致
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 证书机构误用（例如由非CA签发）
    #[error("CA error: {0}")]
    CAError(String),

    /// 未知的用途名称
    #[error("Unknown purpose: {0}")]
    UnknownPurpose(String),

    #[error("Crypto error: {0}")]
    CryptoError(#[from] trustpath_crypto::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PkiError>;
