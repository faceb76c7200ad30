//! # trustpath
//!
//! 证书链验证：信任存储、路径构建、用途检查
//! 以及基于CRL的撤销检查。
//!
//! ## 子crate
//!
//! - `trustpath_crypto` - 签名算法与验证器接口
//! - `trustpath_pki` - 证书、CRL、编解码、信任存储与验证器
//! - `trustpath-cli` - `trustpath` 命令行工具

// 重新导出所有子crate
pub use trustpath_crypto;
pub use trustpath_pki;

pub use trustpath_pki::prelude;
