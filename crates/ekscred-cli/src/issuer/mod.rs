//! 令牌签发模块
//!
//! 该模块负责从 STS 获取预签名的身份断言并编码为 EKS Bearer 令牌。
//! 包含签名能力抽象、基于 SigV4 的 STS 实现以及令牌签发器。

mod presigner;
mod token_issuer;

pub use presigner::{PresignRequest, Presigner, StsPresigner};
pub use token_issuer::{TokenIssuer, CLUSTER_ID_HEADER, MAX_TOKEN_DURATION_SECS};

#[cfg(test)]
pub use presigner::MockPresigner;

use crate::config::Settings;

/// 根据配置创建默认的令牌签发器
pub fn create_default_issuer(settings: &Settings) -> TokenIssuer<StsPresigner> {
    TokenIssuer::new(StsPresigner::new(settings.sts_endpoint.clone()))
}
