//! 令牌签发模块
//!
//! 在预签名请求中加入集群标识头，使签名绑定到目标集群；有效期固定取
//! STS 允许的上限，以尽量减少重新签发的次数。

use chrono::{DateTime, Duration, Utc};
use ekscred_common::{format_timestamp, BearerToken, ExecCredential, Result, TokenRequest};
use std::time::{self, SystemTime};
use tracing::info;

use super::presigner::{PresignRequest, Presigner};

/// EKS 令牌的最长有效期（秒）
pub const MAX_TOKEN_DURATION_SECS: u64 = 900;

/// 绑定集群的请求头
pub const CLUSTER_ID_HEADER: &str = "x-k8s-aws-id";

/// 令牌签发器
pub struct TokenIssuer<P> {
    /// 签名能力
    presigner: P,
}

impl<P: Presigner> TokenIssuer<P> {
    /// 创建新的令牌签发器
    pub fn new(presigner: P) -> Self {
        Self { presigner }
    }

    /// 签发新的凭证
    pub async fn issue(&self, request: &TokenRequest) -> Result<ExecCredential> {
        self.issue_at(request, Utc::now()).await
    }

    /// 以给定时间签发凭证
    ///
    /// 同一个时间既作为签名时间也作为过期时间的起点，因此
    /// `expirationTimestamp` 恰好等于预签名 URL 自身的失效时间。
    pub async fn issue_at(&self, request: &TokenRequest, now: DateTime<Utc>) -> Result<ExecCredential> {
        let presign_request = PresignRequest {
            region: request.region.clone(),
            profile: request.profile.clone(),
            headers: vec![(CLUSTER_ID_HEADER.to_string(), request.cluster_name.clone())],
            expires_in: time::Duration::from_secs(MAX_TOKEN_DURATION_SECS),
            signing_time: SystemTime::from(now),
        };

        let url = self.presigner.presign(presign_request).await?;
        let token = BearerToken::encode(&url);
        let credential = ExecCredential::new(
            token,
            now + Duration::seconds(MAX_TOKEN_DURATION_SECS as i64),
        );

        info!(
            "已为集群 {} 签发新令牌，过期时间 {}",
            request.cluster_name,
            format_timestamp(credential.expires_at())
        );
        Ok(credential)
    }
}
