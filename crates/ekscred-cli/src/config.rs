//! 配置管理模块
//!
//! 该模块负责加载 ekscred 的配置，依次合并内置默认值、可选的 YAML/JSON
//! 配置文件以及 `EKSCRED_` 前缀的环境变量。令牌有效期与缓存余量是固定常量，
//! 不在可配置范围内。

use config::{Config, Environment, File, FileFormat};
use ekscred_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 环境变量前缀
const ENV_PREFIX: &str = "EKSCRED";

/// ekscred 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// 缓存目录，未设置时使用 `~/.kube/cache`
    pub cache_dir: Option<PathBuf>,
    /// 缓存文件是否按 profile 分区
    pub partition_by_profile: bool,
    /// STS 端点覆盖，例如 VPC 端点
    pub sts_endpoint: Option<String>,
    /// 默认日志级别（`RUST_LOG` 优先）
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            partition_by_profile: true,
            sts_endpoint: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// 加载配置
    ///
    /// `explicit` 为命令行指定的配置文件，必须存在；否则尝试读取
    /// 默认位置的配置文件，不存在时忽略。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("partition_by_profile", defaults.partition_by_profile)
            .and_then(|b| b.set_default("log_level", defaults.log_level))
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Some(path) = path {
            let format = file_format(&path)?;
            let file_name = path
                .to_str()
                .ok_or_else(|| Error::Config(format!("配置路径无效: {:?}", path)))?;
            debug!("加载配置文件: {} (必需: {})", file_name, required);
            builder = builder.add_source(File::new(file_name, format).required(required));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| Error::Config(format!("构建配置失败: {}", e)))?
            .try_deserialize::<Settings>()
            .map_err(|e| Error::Config(format!("配置格式错误: {}", e)))?;

        Ok(settings)
    }
}

/// 默认配置文件路径 `$XDG_CONFIG_HOME/ekscred/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ekscred").join("config.yaml"))
}

/// 根据扩展名确定配置文件格式
fn file_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(Error::Config(format!(
            "不支持的配置文件格式，仅支持 YAML 或 JSON: {:?}",
            path
        ))),
    }
}
