//! EKS Bearer 令牌
//!
//! 令牌格式为 `k8s-aws-v1.` 加上预签名 STS URL 的 URL 安全、无填充 base64 编码。

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Error, Result};

/// 令牌前缀
pub const TOKEN_PREFIX: &str = "k8s-aws-v1.";

/// Bearer 令牌编解码
pub struct BearerToken;

impl BearerToken {
    /// 将预签名 URL 编码为令牌
    pub fn encode(presigned_url: &str) -> String {
        format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(presigned_url.as_bytes()))
    }

    /// 从令牌中还原预签名 URL
    pub fn decode(token: &str) -> Result<String> {
        let encoded = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| Error::Input(format!("令牌缺少前缀 {}", TOKEN_PREFIX)))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| Error::Input(format!("令牌不是有效的 base64: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Input(format!("令牌内容不是 UTF-8: {}", e)))
    }
}
