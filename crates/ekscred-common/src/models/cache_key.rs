//! 缓存键模型
//!
//! 缓存文件名由集群名（以及可选的 AWS profile）确定性地推导，
//! 不同的集群/profile 组合永远不会映射到同一个文件。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 缓存文件名前缀
const FILE_PREFIX: &str = "eks-token-";

/// 缓存文件扩展名
const FILE_SUFFIX: &str = ".json";

/// 文件名最大字节数（常见文件系统的 NAME_MAX）
pub const MAX_FILE_NAME_LEN: usize = 255;

/// 缓存键
///
/// 各组成部分都经过百分号编码，编码后不含原始的 `/` 与 `@`，
/// 因此 `profile@cluster` 的拼接是单射的，也不会跳出缓存目录。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// 集群名
    pub cluster: String,
    /// AWS profile（按 profile 分区时存在）
    pub profile: Option<String>,
}

impl CacheKey {
    /// 创建新的缓存键
    pub fn new(cluster: &str, profile: Option<&str>) -> Result<Self> {
        if cluster.trim().is_empty() {
            return Err(Error::Input("集群名称不能为空".to_string()));
        }
        if let Some(profile) = profile {
            if profile.trim().is_empty() {
                return Err(Error::Input("profile 不能为空".to_string()));
            }
        }

        let key = Self {
            cluster: cluster.to_string(),
            profile: profile.map(str::to_string),
        };

        // 超长的文件名要到签发之后写盘时才会失败，这里提前拒绝
        let len = key.file_name().len();
        if len > MAX_FILE_NAME_LEN {
            return Err(Error::Input(format!(
                "集群名或 profile 过长，缓存文件名为 {} 字节，超过上限 {}",
                len, MAX_FILE_NAME_LEN
            )));
        }

        Ok(key)
    }

    /// 缓存文件名
    pub fn file_name(&self) -> String {
        let cluster = urlencoding::encode(&self.cluster);
        match &self.profile {
            Some(profile) => format!(
                "{}{}@{}{}",
                FILE_PREFIX,
                urlencoding::encode(profile),
                cluster,
                FILE_SUFFIX
            ),
            None => format!("{}{}{}", FILE_PREFIX, cluster, FILE_SUFFIX),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.profile {
            Some(profile) => write!(f, "{}@{}", profile, self.cluster),
            None => write!(f, "{}", self.cluster),
        }
    }
}
