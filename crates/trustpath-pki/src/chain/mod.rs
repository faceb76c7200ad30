//! 证书路径构建

pub mod validator;

use tracing::debug;

use crate::{
    cert::Certificate,
    types::VerifyFlags,
    verify::{result::Failure, VerifyCode, VerifyContext},
};

/// 从 `target` 向信任锚构建证书链。
///
/// `chain` 按叶子在前的顺序接收路径上的每张证书，
/// 构建失败时保留部分路径。
pub(crate) fn build_chain(
    ctx: &VerifyContext<'_>,
    target: &Certificate,
    chain: &mut Vec<Certificate>,
) -> Result<(), Failure> {
    chain.clear();
    chain.push(target.clone());
    let partial = ctx.flags().contains(VerifyFlags::PARTIAL_CHAIN);

    loop {
        let depth = chain.len() - 1;
        let current = &chain[depth];
        let self_signed = current.is_self_signed(ctx.verifier);

        if ctx.trusted.contains(current) && (self_signed || partial) {
            debug!(depth, subject = %current.subject(), "reached trust anchor");
            return Ok(());
        }

        if self_signed {
            let message = if depth == 0 {
                "self-signed certificate"
            } else {
                "self-signed certificate in certificate chain"
            };
            return Err(Failure::new(VerifyCode::ChainIncomplete, depth).with_message(message));
        }

        let issuer = find_issuer(ctx, current, chain).ok_or_else(|| {
            Failure::new(VerifyCode::ChainIncomplete, depth)
                .with_message("unable to get local issuer certificate")
        })?;

        if chain.len() > ctx.config.max_depth {
            return Err(Failure::new(VerifyCode::ChainIncomplete, depth)
                .with_message("certificate chain too long"));
        }

        debug!(depth, issuer = %issuer.subject(), "found issuer");
        chain.push(issuer);
    }
}

/// 选择 `cert` 的颁发者，依次搜索受信任集合、调用方提供的
/// 不可信链以及存储中的中间证书。公钥能验证 `cert` 的候选者
/// 优先于仅名称匹配的候选者。
fn find_issuer(
    ctx: &VerifyContext<'_>,
    cert: &Certificate,
    chain: &[Certificate],
) -> Option<Certificate> {
    let on_chain = |candidate: &Certificate| {
        chain
            .iter()
            .any(|c| c.fingerprint() == candidate.fingerprint())
    };

    let candidates: Vec<&Certificate> = ctx
        .trusted
        .by_subject(cert.issuer())
        .iter()
        .chain(ctx.untrusted.iter().filter(|c| c.subject() == cert.issuer()))
        .chain(ctx.intermediates.by_subject(cert.issuer()).iter())
        .filter(|candidate| !on_chain(candidate))
        .collect();

    candidates
        .iter()
        .find(|candidate| cert.is_signed_by(candidate.public_key(), ctx.verifier))
        .or_else(|| candidates.first())
        .map(|candidate| (*candidate).clone())
}
