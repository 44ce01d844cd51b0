//! 令牌获取流程
//!
//! 每次调用的状态机：先查缓存，命中则原样输出；未命中则签发、持久化后输出。
//! 持久化失败视为整体失败，不输出未落盘的凭证。

use ekscred_common::{CacheKey, Result, TokenRequest};
use tracing::{debug, info};

use crate::cache::TokenCache;
use crate::issuer::{Presigner, TokenIssuer};

/// 凭证来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// 来自本地缓存
    Cached,
    /// 新签发
    Fresh,
}

/// 一次调用的输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// 写到标准输出的 ExecCredential 文本
    pub output: String,
    /// 凭证来源
    pub source: TokenSource,
}

/// 令牌提供者
pub struct TokenProvider<P> {
    /// 令牌缓存
    cache: TokenCache,
    /// 令牌签发器
    issuer: TokenIssuer<P>,
    /// 缓存文件是否按 profile 分区
    partition_by_profile: bool,
}

impl<P: Presigner> TokenProvider<P> {
    /// 创建新的令牌提供者
    pub fn new(cache: TokenCache, issuer: TokenIssuer<P>, partition_by_profile: bool) -> Self {
        Self {
            cache,
            issuer,
            partition_by_profile,
        }
    }

    /// 请求对应的缓存键
    pub fn cache_key(&self, request: &TokenRequest) -> Result<CacheKey> {
        let profile = self
            .partition_by_profile
            .then_some(request.profile.as_str());
        CacheKey::new(&request.cluster_name, profile)
    }

    /// 获取令牌
    pub async fn get_token(&self, request: &TokenRequest) -> Result<IssuedToken> {
        let key = self.cache_key(request)?;
        let path = self.cache.locate(&key)?;

        // 先检查缓存
        if let Some(cached) = self.cache.read_valid(&path) {
            debug!("使用缓存的令牌: {}", key);
            return Ok(IssuedToken {
                output: cached.raw,
                source: TokenSource::Cached,
            });
        }

        // 缓存未命中，重新签发并落盘后再输出
        info!("缓存不可用，为 {} 签发新令牌", key);
        let credential = self.issuer.issue(request).await?;
        let output = self.cache.write(&path, &credential)?;

        Ok(IssuedToken {
            output,
            source: TokenSource::Fresh,
        })
    }
}
