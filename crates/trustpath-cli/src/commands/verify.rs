use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Args;
use colored::Colorize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::debug;
use trustpath_pki::{
    parse_certificate, parse_certificates, Certificate, Purpose, TrustStore, VerifyConfig,
    VerifyFlags,
};

use crate::error::{CliError, CliResult};

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// 信任锚证书包（可重复）
    #[arg(long = "trusted", value_name = "FILE")]
    pub trusted: Vec<PathBuf>,

    /// 随目标提供的不可信链（可重复）
    #[arg(long = "untrusted", value_name = "FILE")]
    pub untrusted: Vec<PathBuf>,

    /// 存储中保留的补充中间证书（可重复）
    #[arg(long = "intermediate", value_name = "FILE")]
    pub intermediates: Vec<PathBuf>,

    /// CRL包（可重复）
    #[arg(long = "crl", value_name = "FILE")]
    pub crls: Vec<PathBuf>,

    /// 用途：any, sslclient, sslserver, smimesign, smimeencrypt, crlsign
    #[arg(long)]
    pub purpose: Option<Purpose>,

    /// 根据颁发者的CRL检查目标证书
    #[arg(long)]
    pub crl_check: bool,

    /// 检查根以下的每张证书（隐含 --crl-check）
    #[arg(long)]
    pub crl_check_all: bool,

    /// 接受受信任的中间证书作为链终点
    #[arg(long)]
    pub partial_chain: bool,

    /// 跳过有效期检查
    #[arg(long)]
    pub no_check_time: bool,

    /// 在此 RFC 3339 时间点而非当前时间验证
    #[arg(long, value_parser = parse_time)]
    pub at: Option<OffsetDateTime>,

    /// 中间证书的最大数量
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// JSON验证配置；命令行选项优先
    #[arg(long, env = "TRUSTPATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// 待验证的证书
    pub target: PathBuf,
}

fn parse_time(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("invalid RFC 3339 time: {e}"))
}

/// 合并配置文件与命令行覆盖项
pub fn build_config(args: &VerifyArgs) -> CliResult<VerifyConfig> {
    let mut config = match &args.config {
        Some(path) => VerifyConfig::from_file(path)?,
        None => VerifyConfig::default(),
    };
    if let Some(purpose) = args.purpose {
        config.purpose = purpose;
    }
    if args.crl_check || args.crl_check_all {
        config.flags |= VerifyFlags::CRL_CHECK;
    }
    if args.crl_check_all {
        config.flags |= VerifyFlags::CRL_CHECK_ALL;
    }
    if args.partial_chain {
        config.flags |= VerifyFlags::PARTIAL_CHAIN;
    }
    if args.no_check_time {
        config.flags |= VerifyFlags::NO_CHECK_TIME;
    }
    if let Some(at) = args.at {
        config.verification_time = Some(at);
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

fn read_bundle(path: &Path) -> CliResult<Vec<Certificate>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(parse_certificates(&fs::read_to_string(path)?)?)
}

/// 加载 `args` 描述的存储
pub fn build_store(args: &VerifyArgs) -> CliResult<TrustStore> {
    let mut store = TrustStore::new().with_config(build_config(args)?);
    for path in &args.trusted {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let added = store.add_file(path)?;
        debug!(path = %path.display(), added, "loaded trust anchors");
    }
    for path in &args.intermediates {
        for cert in read_bundle(path)? {
            store.add_intermediate(cert);
        }
    }
    for path in &args.crls {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        store.add_crl_file(path)?;
    }
    Ok(store)
}

pub fn handle(args: VerifyArgs) -> CliResult<()> {
    let mut store = build_store(&args)?;
    if !args.target.exists() {
        return Err(CliError::FileNotFound(args.target.display().to_string()));
    }
    let target = parse_certificate(&fs::read_to_string(&args.target)?)?;
    let mut untrusted = Vec::new();
    for path in &args.untrusted {
        untrusted.extend(read_bundle(path)?);
    }

    println!("{}", format!("Verifying {}", target.subject()).cyan());
    println!(
        "  purpose: {}, trusted: {}, CRLs: {}",
        store.purpose(),
        store.trusted_count(),
        store.crl_count()
    );

    let result = store.verify(&target, &untrusted);

    println!();
    println!("{}", "Chain:".cyan());
    for (depth, cert) in result.chain.iter().enumerate() {
        let marker = if result.depth == Some(depth) {
            "✗".red()
        } else {
            "•".normal()
        };
        println!(
            "  {marker} {depth}: {} (serial {})",
            cert.subject(),
            cert.serial_number()
        );
    }
    println!();

    if result.is_ok() {
        println!("{} {}", "✓".green(), "OK".green().bold());
        Ok(())
    } else {
        println!("{} {}", "✗".red(), result.to_string().red().bold());
        Err(CliError::VerificationFailed(result.to_string()))
    }
}
