//! trustpath 证书链验证工具

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::commands::verify::VerifyArgs;

#[derive(Parser)]
#[command(name = "trustpath")]
#[command(about = "trustpath - certificate chain and revocation verification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 根据信任锚和CRL验证证书
    Verify(VerifyArgs),

    /// 打印证书或CRL包的字段
    Inspect {
        /// 证书包文件
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Verify(args) => commands::verify::handle(args),
        Commands::Inspect { file } => commands::inspect::handle(file),
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
