//! 用于证书指纹的SHA-256辅助函数。

use sha2::{Digest, Sha256};

/// 计算数据的SHA-256哈希
///
/// # 示例
/// ```
/// use trustpath_crypto::hash::sha256;
///
/// let digest = sha256(b"Hello, World!");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// 对多个部分计算SHA-256，等同于拼接后计算
pub fn sha256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// 计算SHA-256哈希并返回小写十六进制
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
