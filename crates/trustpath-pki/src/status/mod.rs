//! 基于CRL的证书撤销检查

pub mod crl;

use tracing::{debug, warn};

use self::crl::CertificateRevocationList;
use crate::{
    cert::{Certificate, KeyUsage},
    verify::{result::Failure, VerifyCode, VerifyContext},
};

/// 针对已构建链的CRL撤销检查器
pub struct RevocationChecker<'a, 'ctx> {
    ctx: &'a VerifyContext<'ctx>,
}

impl<'a, 'ctx> RevocationChecker<'a, 'ctx> {
    pub fn new(ctx: &'a VerifyContext<'ctx>) -> Self {
        Self { ctx }
    }

    /// 检查叶子证书，或在 `CRL_CHECK_ALL` 下检查根以下的每张证书。
    /// 即使叶子就是根，也总会检查叶子。
    pub(crate) fn check(&self, chain: &[Certificate]) -> Result<(), Failure> {
        let last = chain.len().saturating_sub(1);
        let checked = if self.ctx.flags().check_all_crls() {
            last.max(1)
        } else {
            1
        };

        for depth in 0..checked.min(chain.len()) {
            let cert = &chain[depth];
            let issuer = chain.get(depth + 1).unwrap_or(cert);
            self.check_certificate(depth, cert, issuer)?;
        }
        Ok(())
    }

    fn check_certificate(
        &self,
        depth: usize,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<(), Failure> {
        let usable: Vec<&CertificateRevocationList> = self
            .ctx
            .crls
            .by_issuer(cert.issuer())
            .iter()
            .filter(|crl| self.is_usable(crl, issuer))
            .collect();

        if usable.is_empty() {
            return Err(Failure::new(VerifyCode::UnableToGetCrl, depth));
        }

        if let Some(crl) = usable.iter().find(|crl| crl.is_revoked(cert.serial_number())) {
            debug!(
                depth,
                serial = %cert.serial_number(),
                crl = %crl.fingerprint(),
                "certificate is revoked"
            );
            return Err(Failure::new(VerifyCode::CertificateRevoked, depth));
        }

        debug!(depth, crls = usable.len(), "certificate not revoked");
        Ok(())
    }

    fn is_usable(&self, crl: &CertificateRevocationList, issuer: &Certificate) -> bool {
        if !crl.is_signed_by(issuer.public_key(), self.ctx.verifier) {
            warn!(
                issuer = %crl.issuer(),
                crl = %crl.fingerprint(),
                "skipping CRL with bad signature"
            );
            return false;
        }
        if issuer
            .key_usage()
            .is_some_and(|ku| !ku.has(KeyUsage::CRL_SIGN))
        {
            warn!(issuer = %crl.issuer(), "skipping CRL from issuer without cRLSign");
            return false;
        }
        if self.ctx.check_time() && !crl.is_current_at(self.ctx.now) {
            warn!(
                issuer = %crl.issuer(),
                this_update = %crl.this_update(),
                "skipping CRL outside its validity window"
            );
            return false;
        }
        true
    }
}
