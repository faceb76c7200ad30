use tracing::debug;

use crate::{
    cert::{Certificate, KeyUsage},
    types::{Purpose, ANY_EXTENDED_KEY_USAGE},
    verify::{result::Failure, VerifyCode, VerifyContext},
};

/// 对已构建链的逐环节检查
pub struct ChainValidator<'a, 'ctx> {
    ctx: &'a VerifyContext<'ctx>,
}

impl<'a, 'ctx> ChainValidator<'a, 'ctx> {
    pub fn new(ctx: &'a VerifyContext<'ctx>) -> Self {
        Self { ctx }
    }

    /// 从叶子到根验证每个环节，返回第一个失败
    pub(crate) fn validate(&self, chain: &[Certificate]) -> Result<(), Failure> {
        for (depth, cert) in chain.iter().enumerate() {
            self.check_signature(chain, depth, cert)?;
            if self.ctx.check_time() {
                self.check_time(depth, cert)?;
            }
            if depth > 0 {
                self.check_ca(chain, depth, cert)?;
            }
            self.check_purpose(depth, cert)?;
            debug!(depth, subject = %cert.subject(), "certificate passed checks");
        }
        Ok(())
    }

    fn check_signature(
        &self,
        chain: &[Certificate],
        depth: usize,
        cert: &Certificate,
    ) -> Result<(), Failure> {
        let issuer = match chain.get(depth + 1) {
            Some(issuer) => issuer,
            // 非自颁发的受信任锚在链上没有颁发者
            None if !cert.is_self_issued() => return Ok(()),
            None => cert,
        };
        if cert.is_signed_by(issuer.public_key(), self.ctx.verifier) {
            Ok(())
        } else {
            Err(Failure::new(VerifyCode::InvalidSignature, depth))
        }
    }

    fn check_time(&self, depth: usize, cert: &Certificate) -> Result<(), Failure> {
        let now = self.ctx.now;
        if now < cert.not_before() {
            return Err(Failure::new(VerifyCode::CertificateNotYetValid, depth));
        }
        if now > cert.not_after() {
            return Err(Failure::new(VerifyCode::CertificateExpired, depth));
        }
        Ok(())
    }

    fn check_ca(
        &self,
        chain: &[Certificate],
        depth: usize,
        cert: &Certificate,
    ) -> Result<(), Failure> {
        if !cert.is_ca() {
            return Err(Failure::new(VerifyCode::InvalidCa, depth));
        }
        if let Some(path_len) = cert.path_len_constraint() {
            let below = chain[1..depth]
                .iter()
                .filter(|c| !c.is_self_issued())
                .count();
            if below > path_len as usize {
                return Err(Failure::new(VerifyCode::InvalidCa, depth)
                    .with_message("path length constraint exceeded"));
            }
        }
        Ok(())
    }

    fn check_purpose(&self, depth: usize, cert: &Certificate) -> Result<(), Failure> {
        let purpose = self.ctx.config.purpose;
        if purpose == Purpose::Any {
            return Ok(());
        }
        let allowed = if depth == 0 {
            leaf_allows(cert, purpose)
        } else {
            cert.key_usage()
                .map_or(true, |ku| ku.has(KeyUsage::KEY_CERT_SIGN))
        };
        if allowed {
            Ok(())
        } else {
            Err(Failure::new(VerifyCode::PurposeMismatch, depth))
        }
    }
}

fn leaf_allows(cert: &Certificate, purpose: Purpose) -> bool {
    let key_usage_ok = match (cert.key_usage(), purpose.leaf_key_usage()) {
        (Some(ku), Some(mask)) => ku.intersects(mask),
        _ => true,
    };
    let extended_ok = match (cert.extended_key_usage(), purpose.extended_key_usage()) {
        (Some(oids), Some(wanted)) => oids
            .iter()
            .any(|oid| oid == wanted || oid == ANY_EXTENDED_KEY_USAGE),
        _ => true,
    };
    key_usage_ok && extended_ok
}
