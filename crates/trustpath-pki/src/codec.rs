//! 证书与CRL的信封编解码器
//!
//! 每个对象存储为JSON信封，包含base64编码的签名主体
//! 和base64编码的签名。签名主体本身也是JSON，因此颁发者签名的
//! 字节被原样携带，重新编码不会改变它们。

use serde::{Deserialize, Serialize};

use crate::{
    cert::{Certificate, CertificateInfo},
    error::{PkiError, Result as PkiResult},
    status::crl::{CertificateRevocationList, CrlInfo},
};

/// 以标准base64存储的字节字段的serde适配器
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// 每个信封携带的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Certificate,
    Crl,
}

/// 签名主体加分离签名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub kind: EnvelopeKind,
    #[serde(with = "base64_bytes")]
    pub tbs: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(SignedEnvelope),
    Many(Vec<SignedEnvelope>),
}

fn parse_envelopes(input: &str) -> PkiResult<Vec<SignedEnvelope>> {
    let parsed: OneOrMany = serde_json::from_str(input)
        .map_err(|e| PkiError::ParseError(format!("malformed envelope: {e}")))?;
    Ok(match parsed {
        OneOrMany::One(envelope) => vec![envelope],
        OneOrMany::Many(envelopes) => envelopes,
    })
}

fn expect_kind(envelope: &SignedEnvelope, kind: EnvelopeKind) -> PkiResult<()> {
    if envelope.kind != kind {
        return Err(PkiError::ParseError(format!(
            "expected {kind:?} envelope, found {:?}",
            envelope.kind
        )));
    }
    Ok(())
}

fn certificate_from_envelope(envelope: SignedEnvelope) -> PkiResult<Certificate> {
    expect_kind(&envelope, EnvelopeKind::Certificate)?;
    let info: CertificateInfo = serde_json::from_slice(&envelope.tbs)
        .map_err(|e| PkiError::ParseError(format!("malformed certificate body: {e}")))?;
    Ok(Certificate::new(info, envelope.tbs, envelope.signature))
}

fn crl_from_envelope(envelope: SignedEnvelope) -> PkiResult<CertificateRevocationList> {
    expect_kind(&envelope, EnvelopeKind::Crl)?;
    let info: CrlInfo = serde_json::from_slice(&envelope.tbs)
        .map_err(|e| PkiError::ParseError(format!("malformed CRL body: {e}")))?;
    Ok(CertificateRevocationList::new(
        info,
        envelope.tbs,
        envelope.signature,
    ))
}

/// 解析恰好一张证书
pub fn parse_certificate(input: &str) -> PkiResult<Certificate> {
    let mut envelopes = parse_envelopes(input)?;
    if envelopes.len() != 1 {
        return Err(PkiError::ParseError(format!(
            "expected one certificate, found {}",
            envelopes.len()
        )));
    }
    certificate_from_envelope(envelopes.remove(0))
}

/// 解析单个证书信封或其数组
pub fn parse_certificates(input: &str) -> PkiResult<Vec<Certificate>> {
    parse_envelopes(input)?
        .into_iter()
        .map(certificate_from_envelope)
        .collect()
}

/// 解析恰好一个CRL
pub fn parse_crl(input: &str) -> PkiResult<CertificateRevocationList> {
    let mut crls = parse_crls(input)?;
    if crls.len() != 1 {
        return Err(PkiError::ParseError(format!(
            "expected one CRL, found {}",
            crls.len()
        )));
    }
    Ok(crls.remove(0))
}

pub fn parse_crls(input: &str) -> PkiResult<Vec<CertificateRevocationList>> {
    parse_envelopes(input)?
        .into_iter()
        .map(crl_from_envelope)
        .collect()
}

fn to_envelope(kind: EnvelopeKind, tbs: &[u8], signature: &[u8]) -> SignedEnvelope {
    SignedEnvelope {
        kind,
        tbs: tbs.to_vec(),
        signature: signature.to_vec(),
    }
}

pub fn encode_certificate(cert: &Certificate) -> PkiResult<String> {
    let envelope = to_envelope(
        EnvelopeKind::Certificate,
        cert.signed_data(),
        cert.signature(),
    );
    serde_json::to_string_pretty(&envelope).map_err(|e| PkiError::EncodingError(e.to_string()))
}

/// 将多张证书编码为JSON数组
pub fn encode_certificates(certs: &[Certificate]) -> PkiResult<String> {
    let envelopes: Vec<SignedEnvelope> = certs
        .iter()
        .map(|c| to_envelope(EnvelopeKind::Certificate, c.signed_data(), c.signature()))
        .collect();
    serde_json::to_string_pretty(&envelopes).map_err(|e| PkiError::EncodingError(e.to_string()))
}

pub fn encode_crl(crl: &CertificateRevocationList) -> PkiResult<String> {
    let envelope = to_envelope(EnvelopeKind::Crl, crl.signed_data(), crl.signature());
    serde_json::to_string_pretty(&envelope).map_err(|e| PkiError::EncodingError(e.to_string()))
}
