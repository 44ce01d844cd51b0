//! 命令行参数定义

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 带本地缓存的 EKS 认证令牌工具
#[derive(Debug, Parser)]
#[command(name = "ekscred", version, about)]
pub struct Cli {
    /// 配置文件路径（YAML 或 JSON）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// 顶层子命令
#[derive(Debug, Subcommand)]
pub enum Command {
    /// EKS 相关操作
    #[command(subcommand)]
    Eks(EksCommand),

    /// kubeconfig 相关操作
    #[command(subcommand)]
    Kubeconfig(KubeconfigCommand),
}

/// `eks` 子命令
#[derive(Debug, Subcommand)]
pub enum EksCommand {
    /// 获取 EKS 认证令牌（ExecCredential 格式）
    GetToken(GetTokenArgs),
}

/// `eks get-token` 参数
#[derive(Debug, Clone, Args)]
pub struct GetTokenArgs {
    /// AWS 区域
    #[arg(long)]
    pub region: String,

    /// EKS 集群名
    #[arg(long)]
    pub cluster_name: String,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// 输出格式，目前只支持 JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
}

/// `kubeconfig` 子命令
#[derive(Debug, Subcommand)]
pub enum KubeconfigCommand {
    /// 以表格形式显示 kubeconfig 中的上下文
    Show(ShowArgs),
}

/// `kubeconfig show` 参数
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// kubeconfig 文件路径
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,
}
