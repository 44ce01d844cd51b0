//! ekscred 命令行入口

use anyhow::{Context, Result};
use clap::Parser;
use ekscred_cli::cli::{Cli, Command, EksCommand, KubeconfigCommand};
use ekscred_cli::config::Settings;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// 初始化日志，只输出到标准错误，标准输出留给凭证
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 执行命令，返回写到标准输出的文本；失败时不产生任何输出
async fn run(cli: Cli, settings: Settings) -> Result<String> {
    match cli.command {
        Command::Eks(EksCommand::GetToken(args)) => {
            let issued = ekscred_cli::get_token(&args, &settings)
                .await
                .context("获取 EKS 令牌失败")?;
            Ok(format!("{}\n", issued.output))
        }
        Command::Kubeconfig(KubeconfigCommand::Show(args)) => {
            let table = ekscred_cli::show_kubeconfig(&args).context("显示 kubeconfig 失败")?;
            Ok(table)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ekscred_common::Error>()
        .map(|e| e.exit_code())
        .unwrap_or(1)
        .clamp(1, 255) as u8
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref());
    let level = settings
        .as_ref()
        .map(|s| s.log_level.clone())
        .unwrap_or_else(|_| Settings::default().log_level);
    init_logging(&level);

    let result = match settings {
        Ok(settings) => run(cli, settings).await,
        Err(e) => Err(anyhow::Error::new(e).context("加载配置失败")),
    };

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
