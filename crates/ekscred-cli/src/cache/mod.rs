//! 缓存模块
//!
//! 负责在本地磁盘上按集群（和 profile）保存 ExecCredential，并判断其是否仍可使用。

mod token_cache;

pub use token_cache::{CachedCredential, TokenCache, CACHE_EXPIRY_MARGIN_SECS};

use crate::config::Settings;
use ekscred_common::Result;

/// 根据配置创建令牌缓存
pub fn create_cache(settings: &Settings) -> Result<TokenCache> {
    let dir = match &settings.cache_dir {
        Some(dir) => dir.clone(),
        None => TokenCache::default_dir()?,
    };
    Ok(TokenCache::new(dir))
}
