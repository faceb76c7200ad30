use thiserror::Error;

/// 密码学模块错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("ECDSA error: {0}")]
    EcdsaError(#[from] p256::ecdsa::Error),

    #[error("Elliptic curve error: {0}")]
    EllipticCurveError(#[from] p256::elliptic_curve::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;
