use std::{fs, path::PathBuf};

use colored::Colorize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use trustpath_pki::{parse_certificates, parse_crls, Certificate, CertificateRevocationList};

use crate::error::{CliError, CliResult};

fn format_time(time: OffsetDateTime) -> String {
    time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}

/// 描述证书的行
pub fn describe_certificate(cert: &Certificate) -> Vec<String> {
    let mut lines = vec![
        format!("subject: {}", cert.subject()),
        format!("issuer: {}", cert.issuer()),
        format!("serial: {}", cert.serial_number()),
        format!("not before: {}", format_time(cert.not_before())),
        format!("not after: {}", format_time(cert.not_after())),
        format!(
            "public key: {} ({} bytes)",
            cert.public_key().algorithm,
            cert.public_key().key.len()
        ),
        format!("signature algorithm: {}", cert.signature_algorithm()),
        format!("fingerprint: {}", cert.fingerprint()),
    ];
    if let Some(bc) = cert.extensions().basic_constraints {
        let path_len = bc
            .path_len_constraint
            .map(|n| format!(", pathlen:{n}"))
            .unwrap_or_default();
        lines.push(format!(
            "basic constraints: CA:{}{path_len}",
            if bc.is_ca { "TRUE" } else { "FALSE" }
        ));
    }
    if let Some(ku) = cert.key_usage() {
        lines.push(format!("key usage: {ku}"));
    }
    if let Some(eku) = cert.extended_key_usage() {
        lines.push(format!("extended key usage: {}", eku.join(", ")));
    }
    lines
}

/// 描述CRL的行
pub fn describe_crl(crl: &CertificateRevocationList) -> Vec<String> {
    let mut lines = vec![
        format!("issuer: {}", crl.issuer()),
        format!("this update: {}", format_time(crl.this_update())),
        format!(
            "next update: {}",
            crl.next_update()
                .map(format_time)
                .unwrap_or_else(|| "none".to_string())
        ),
    ];
    if let Some(number) = crl.crl_number() {
        lines.push(format!("CRL number: {number}"));
    }
    lines.push(format!(
        "revoked certificates: {}",
        crl.revoked_certificates().len()
    ));
    for entry in crl.revoked_certificates() {
        let reason = entry
            .reason
            .map(|r| format!(" ({r:?})"))
            .unwrap_or_default();
        lines.push(format!(
            "  serial {} at {}{reason}",
            entry.serial_number,
            format_time(entry.revocation_date)
        ));
    }
    lines.push(format!("fingerprint: {}", crl.fingerprint()));
    lines
}

pub fn handle(file: PathBuf) -> CliResult<()> {
    if !file.exists() {
        return Err(CliError::FileNotFound(file.display().to_string()));
    }
    let contents = fs::read_to_string(&file)?;

    let sections: Vec<(String, Vec<String>)> = match parse_certificates(&contents) {
        Ok(certs) => certs
            .iter()
            .enumerate()
            .map(|(i, cert)| (format!("Certificate #{i}"), describe_certificate(cert)))
            .collect(),
        Err(cert_err) => match parse_crls(&contents) {
            Ok(crls) => crls
                .iter()
                .enumerate()
                .map(|(i, crl)| (format!("CRL #{i}"), describe_crl(crl)))
                .collect(),
            Err(_) => return Err(cert_err.into()),
        },
    };

    for (title, lines) in sections {
        println!("{}", title.cyan().bold());
        for line in lines {
            println!("  {line}");
        }
        println!();
    }
    Ok(())
}
