//! 验证驱动
//!
//! 一次验证依次经过路径构建、证书链验证，
//! 以及设置 `CRL_CHECK` 时的撤销检查。每个阶段要么交给下一阶段，
//! 要么以失败结束本次验证。

pub mod result;

use time::OffsetDateTime;
use tracing::{debug, info};
use trustpath_crypto::SignatureVerifier;

pub use self::result::{VerificationResult, VerifyCode};
use self::result::Failure;
use crate::{
    cert::Certificate,
    chain::{build_chain, validator::ChainValidator},
    config::VerifyConfig,
    status::RevocationChecker,
    store::index::{CertificateIndex, CrlIndex},
    types::VerifyFlags,
};

/// 单次验证读取的全部数据的借用视图
pub struct VerifyContext<'a> {
    pub trusted: &'a CertificateIndex,
    pub intermediates: &'a CertificateIndex,
    pub crls: &'a CrlIndex,
    /// 调用方提供的链提示
    pub untrusted: &'a [Certificate],
    pub config: &'a VerifyConfig,
    pub verifier: &'a dyn SignatureVerifier,
    pub now: OffsetDateTime,
}

impl<'a> VerifyContext<'a> {
    pub fn flags(&self) -> VerifyFlags {
        self.config.flags
    }

    pub fn check_time(&self) -> bool {
        !self.config.flags.contains(VerifyFlags::NO_CHECK_TIME)
    }
}

#[derive(Debug)]
enum VerifyState {
    BuildingPath,
    ValidatingChain,
    CheckingRevocation,
    Done(Result<(), Failure>),
}

/// 对 `target` 执行完整验证
pub fn verify_certificate(ctx: &VerifyContext<'_>, target: &Certificate) -> VerificationResult {
    let mut chain = Vec::new();
    let mut state = VerifyState::BuildingPath;

    let outcome = loop {
        state = match state {
            VerifyState::BuildingPath => {
                if target.signed_data().is_empty() || target.signature().is_empty() {
                    VerifyState::Done(Err(Failure::new(VerifyCode::InvalidInput, 0)
                        .with_message("certificate has no signed content or signature")))
                } else {
                    match build_chain(ctx, target, &mut chain) {
                        Ok(()) => VerifyState::ValidatingChain,
                        Err(failure) => VerifyState::Done(Err(failure)),
                    }
                }
            }
            VerifyState::ValidatingChain => match ChainValidator::new(ctx).validate(&chain) {
                Ok(()) if ctx.flags().contains(VerifyFlags::CRL_CHECK) => {
                    VerifyState::CheckingRevocation
                }
                other => VerifyState::Done(other),
            },
            VerifyState::CheckingRevocation => {
                VerifyState::Done(RevocationChecker::new(ctx).check(&chain))
            }
            VerifyState::Done(outcome) => break outcome,
        };
        debug!(state = ?state, "verification state");
    };

    let result = match outcome {
        Ok(()) => VerificationResult::ok(chain),
        Err(failure) => VerificationResult::failed(failure, chain),
    };
    info!(
        subject = %target.subject(),
        code = ?result.code,
        depth = ?result.depth,
        chain_len = result.chain.len(),
        "verification finished"
    );
    result
}
