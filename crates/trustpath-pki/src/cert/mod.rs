pub mod name;
pub mod types;

// 重新导出常用类型
pub use name::Name;
pub use types::{
    BasicConstraints, Certificate, CertificateInfo, Extensions, KeyUsage, PublicKey, SerialNumber,
};
