//! STS 预签名模块
//!
//! 该模块封装外部签名能力：为固定的 STS `GetCallerIdentity` 请求生成
//! 带有效期的 SigV4 预签名 URL。凭证通过 AWS 默认凭证链按 profile 和区域解析。

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SignatureLocation, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use ekscred_common::{Error, Result};
use std::time::{Duration, SystemTime};
use tracing::{debug, error};
use url::Url;

/// STS 服务签名名称
const STS_SERVICE: &str = "sts";

/// GetCallerIdentity 查询参数
const CALLER_IDENTITY_QUERY: [(&str, &str); 2] =
    [("Action", "GetCallerIdentity"), ("Version", "2011-06-15")];

/// 预签名请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    /// AWS 区域
    pub region: String,
    /// AWS profile
    pub profile: String,
    /// 需要参与签名的额外请求头
    pub headers: Vec<(String, String)>,
    /// 预签名有效期
    pub expires_in: Duration,
    /// 签名时间
    pub signing_time: SystemTime,
}

/// 签名能力
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Presigner: Send + Sync {
    /// 生成 GetCallerIdentity 的预签名 URL
    async fn presign(&self, request: PresignRequest) -> Result<String>;
}

/// 基于 AWS SigV4 的 STS 预签名器
#[derive(Debug, Clone, Default)]
pub struct StsPresigner {
    /// STS 端点覆盖
    endpoint_override: Option<String>,
}

impl StsPresigner {
    /// 创建新的预签名器
    pub fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    /// 区域对应的 STS 端点
    pub fn endpoint_for(&self, region: &str) -> String {
        if let Some(endpoint) = &self.endpoint_override {
            return endpoint.clone();
        }
        let suffix = if region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        format!("https://sts.{}.{}/", region, suffix)
    }

    /// 未签名的 GetCallerIdentity URL
    fn caller_identity_url(&self, region: &str) -> Result<Url> {
        let endpoint = self.endpoint_for(region);
        Url::parse_with_params(&endpoint, CALLER_IDENTITY_QUERY)
            .map_err(|e| Error::Issuance(format!("无效的 STS 端点 {}: {}", endpoint, e)))
    }

    /// 按 profile 和区域解析 AWS 凭证
    async fn resolve_credentials(region: &str, profile: &str) -> Result<Credentials> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .profile_name(profile)
            .load()
            .await;

        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            Error::Issuance(format!("profile {} 没有可用的凭证提供者", profile))
        })?;

        provider.provide_credentials().await.map_err(|e| {
            error!("解析 AWS 凭证失败: {}", e);
            Error::Issuance(format!("无法解析 profile {} 的 AWS 凭证: {}", profile, e))
        })
    }

    /// 使用给定凭证对请求进行查询参数签名
    pub fn presign_with(&self, credentials: Credentials, request: &PresignRequest) -> Result<String> {
        let url = self.caller_identity_url(&request.region)?;
        let identity: Identity = credentials.into();

        // 签名放在查询参数中，X-Amz-Expires 取请求的有效期
        let mut settings = SigningSettings::default();
        settings.signature_location = SignatureLocation::QueryParams;
        settings.expires_in = Some(request.expires_in);

        let params: SigningParams = v4::SigningParams::builder()
            .identity(&identity)
            .region(&request.region)
            .name(STS_SERVICE)
            .time(request.signing_time)
            .settings(settings)
            .build()
            .map_err(|e| Error::Issuance(format!("构建签名参数失败: {}", e)))?
            .into();

        let signable = SignableRequest::new(
            "GET",
            url.as_str(),
            request
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
            SignableBody::Bytes(&[]),
        )
        .map_err(|e| Error::Issuance(format!("无法构造待签名请求: {}", e)))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| Error::Issuance(format!("签名失败: {}", e)))?
            .into_parts();

        // 把签名参数追加到 URL 上
        let mut signed = http::Request::builder()
            .method("GET")
            .uri(url.as_str())
            .body(())
            .map_err(|e| Error::Issuance(format!("无法构造 HTTP 请求: {}", e)))?;
        instructions.apply_to_request_http1x(&mut signed);

        Ok(signed.uri().to_string())
    }
}

#[async_trait]
impl Presigner for StsPresigner {
    async fn presign(&self, request: PresignRequest) -> Result<String> {
        debug!(
            "为 profile {} 在区域 {} 预签名 GetCallerIdentity",
            request.profile, request.region
        );
        let credentials = Self::resolve_credentials(&request.region, &request.profile).await?;
        self.presign_with(credentials, &request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request() -> PresignRequest {
        PresignRequest {
            region: "eu-west-1".to_string(),
            profile: "admin".to_string(),
            headers: vec![("x-k8s-aws-id".to_string(), "prod".to_string())],
            expires_in: Duration::from_secs(900),
            // 2026-10-18T12:00:00Z
            signing_time: SystemTime::UNIX_EPOCH + Duration::from_secs(1_792_324_800),
        }
    }

    fn credentials(session_token: Option<&str>) -> Credentials {
        Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            session_token.map(str::to_string),
            None,
            "test",
        )
    }

    fn query(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_regional_endpoints() {
        let presigner = StsPresigner::default();
        assert_eq!(presigner.endpoint_for("us-east-1"), "https://sts.us-east-1.amazonaws.com/");
        assert_eq!(presigner.endpoint_for("cn-north-1"), "https://sts.cn-north-1.amazonaws.com.cn/");

        let custom = StsPresigner::new(Some("https://sts.vpce.example.com/".to_string()));
        assert_eq!(custom.endpoint_for("us-east-1"), "https://sts.vpce.example.com/");
    }

    #[test]
    fn test_presigned_url_shape() {
        let presigner = StsPresigner::default();
        let url = presigner.presign_with(credentials(None), &request()).unwrap();
        assert!(url.starts_with("https://sts.eu-west-1.amazonaws.com/?"));

        let q = query(&url);
        assert_eq!(q["Action"], "GetCallerIdentity");
        assert_eq!(q["Version"], "2011-06-15");
        assert_eq!(q["X-Amz-Algorithm"], "AWS4-HMAC-SHA256");
        assert_eq!(q["X-Amz-Expires"], "900");
        assert_eq!(q["X-Amz-Date"], "20261018T120000Z");
        assert_eq!(q["X-Amz-SignedHeaders"], "host;x-k8s-aws-id");
        assert_eq!(
            q["X-Amz-Credential"],
            "AKIDEXAMPLE/20261018/eu-west-1/sts/aws4_request"
        );
        assert_eq!(q["X-Amz-Signature"].len(), 64);
        assert!(!q.contains_key("X-Amz-Security-Token"));
    }

    #[test]
    fn test_session_token_is_carried() {
        let presigner = StsPresigner::default();
        let url = presigner
            .presign_with(credentials(Some("session-token")), &request())
            .unwrap();
        assert_eq!(query(&url)["X-Amz-Security-Token"], "session-token");
    }

    #[test]
    fn test_signature_binds_cluster_header() {
        let presigner = StsPresigner::default();
        let a = presigner.presign_with(credentials(None), &request()).unwrap();
        let again = presigner.presign_with(credentials(None), &request()).unwrap();
        assert_eq!(a, again);

        let mut other = request();
        other.headers = vec![("x-k8s-aws-id".to_string(), "staging".to_string())];
        let b = presigner.presign_with(credentials(None), &other).unwrap();
        assert_ne!(query(&a)["X-Amz-Signature"], query(&b)["X-Amz-Signature"]);
    }

    #[test]
    fn test_invalid_endpoint_is_issuance_error() {
        let presigner = StsPresigner::new(Some("not a url".to_string()));
        let err = presigner.presign_with(credentials(None), &request()).unwrap_err();
        assert!(matches!(err, Error::Issuance(_)));
    }
}
