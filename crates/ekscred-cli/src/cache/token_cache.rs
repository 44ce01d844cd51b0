//! 令牌缓存模块
//!
//! 该模块把签发好的 ExecCredential 缓存到本地磁盘，避免每次调用都访问 STS。
//! 读取失败的各种情况（不存在、不可读、解析失败、即将过期）一律视为未命中，
//! 调用方总能回退到重新签发；写入失败则作为存储错误向上返回。

use chrono::{DateTime, Duration, Utc};
use ekscred_common::{format_timestamp, CacheKey, Error, ExecCredential, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::utils::format_remaining;

/// 缓存余量（秒）：剩余有效期不超过该值的令牌视为已过期
pub const CACHE_EXPIRY_MARGIN_SECS: i64 = 30;

/// 缓存目录权限
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// 缓存文件权限
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// 命中的缓存条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    /// 解析后的凭证
    pub credential: ExecCredential,
    /// 文件原文，命中时原样输出
    pub raw: String,
}

/// 令牌缓存管理器
#[derive(Debug, Clone)]
pub struct TokenCache {
    /// 缓存目录
    dir: PathBuf,
}

impl TokenCache {
    /// 创建新的令牌缓存
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 默认缓存目录 `~/.kube/cache`
    pub fn default_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".kube").join("cache"))
            .ok_or_else(|| Error::Storage("无法确定用户主目录".to_string()))
    }

    /// 缓存目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 计算缓存文件路径，并确保缓存目录存在
    pub fn locate(&self, key: &CacheKey) -> Result<PathBuf> {
        create_private_dir(&self.dir).map_err(|e| {
            Error::Storage(format!("无法创建缓存目录 {}: {}", self.dir.display(), e))
        })?;

        Ok(self.dir.join(key.file_name()))
    }

    /// 读取仍然有效的缓存凭证
    pub fn read_valid(&self, path: &Path) -> Option<CachedCredential> {
        self.read_valid_at(path, Utc::now())
    }

    /// 以给定时间为基准读取仍然有效的缓存凭证
    pub fn read_valid_at(&self, path: &Path, now: DateTime<Utc>) -> Option<CachedCredential> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("缓存未命中，无法读取 {}: {}", path.display(), e);
                return None;
            }
        };

        let credential = match ExecCredential::from_json(&raw) {
            Ok(credential) => credential,
            Err(e) => {
                debug!("缓存未命中，无法解析 {}: {}", path.display(), e);
                return None;
            }
        };

        if !credential.has_expected_schema() {
            debug!(
                "缓存未命中，{} 的格式不匹配: {}/{}",
                path.display(),
                credential.api_version,
                credential.kind
            );
            return None;
        }

        if !credential.is_valid_at(now, Duration::seconds(CACHE_EXPIRY_MARGIN_SECS)) {
            debug!(
                "缓存未命中，令牌即将过期: {}",
                format_timestamp(credential.expires_at())
            );
            return None;
        }

        debug!(
            "缓存命中: {}，剩余有效期 {}",
            path.display(),
            format_remaining(credential.expires_at() - now)
        );
        Some(CachedCredential { credential, raw })
    }

    /// 读取缓存文件但不检查过期时间
    pub fn read(&self, path: &Path) -> Result<ExecCredential> {
        let raw = fs::read_to_string(path)?;
        ExecCredential::from_json(&raw)
    }

    /// 写入缓存文件，返回写入的文本
    ///
    /// 先写入同目录下的临时文件再原子重命名，并发读取者只会看到
    /// 旧文件或完整的新文件。
    pub fn write(&self, path: &Path, credential: &ExecCredential) -> Result<String> {
        let contents = credential.to_pretty_json()?;

        persist_atomically(path, contents.as_bytes()).map_err(|e| {
            error!("写入缓存文件 {} 失败: {}", path.display(), e);
            Error::Storage(format!("无法写入缓存文件 {}: {}", path.display(), e))
        })?;

        info!(
            "令牌已写入缓存 {}，过期时间 {}",
            path.display(),
            format_timestamp(credential.expires_at())
        );
        Ok(contents)
    }
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}

fn persist_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".eks-token-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(FILE_MODE))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
