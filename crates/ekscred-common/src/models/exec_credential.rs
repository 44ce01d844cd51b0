//! ExecCredential 凭证模型
//!
//! kubectl 的 exec 凭证插件通过标准输出读取该结构：
//! `client.authentication.k8s.io/v1beta1` 版本的 ExecCredential。
//! 同一份 JSON 也原样写入磁盘作为缓存。

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::token::TOKEN_PREFIX;

/// ExecCredential API 版本
pub const API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

/// ExecCredential 类型
pub const KIND: &str = "ExecCredential";

/// ExecCredential 凭证工件
///
/// 所有字段在解析时都是必需的，不存在只有令牌没有过期时间的中间状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    /// API 版本
    pub api_version: String,
    /// 类型
    pub kind: String,
    /// 凭证状态
    pub status: ExecCredentialStatus,
}

/// 凭证状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredentialStatus {
    /// 过期时间（UTC，秒精度，RFC 3339）
    #[serde(with = "rfc3339_secs")]
    pub expiration_timestamp: DateTime<Utc>,
    /// Bearer 令牌
    pub token: String,
}

impl ExecCredential {
    /// 创建新的凭证，过期时间截断到秒
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            status: ExecCredentialStatus {
                expiration_timestamp: truncate_to_secs(expires_at),
                token,
            },
        }
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 序列化为两空格缩进的 JSON
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 过期时间
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.status.expiration_timestamp
    }

    /// Bearer 令牌
    pub fn token(&self) -> &str {
        &self.status.token
    }

    /// 距离过期时间是否严格大于 `margin`
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at() - now > margin
    }

    /// apiVersion/kind 与当前格式一致，且令牌带有 `k8s-aws-v1.` 前缀和非空内容
    pub fn has_expected_schema(&self) -> bool {
        self.api_version == API_VERSION
            && self.kind == KIND
            && self.status.token.len() > TOKEN_PREFIX.len()
            && self.status.token.starts_with(TOKEN_PREFIX)
    }
}

fn truncate_to_secs(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}

/// RFC 3339 秒精度、以 `Z` 结尾的时间格式
mod rfc3339_secs {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(t: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// 按输出格式渲染时间，供日志使用
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn sample() -> ExecCredential {
        let expires = Utc.with_ymd_and_hms(2026, 10, 18, 12, 15, 0).unwrap();
        ExecCredential::new("k8s-aws-v1.aHR0cHM6Ly9leGFtcGxl".to_string(), expires)
    }

    #[test]
    fn test_pretty_json_layout() {
        let json = sample().to_pretty_json().unwrap();
        let expected = r#"{
  "apiVersion": "client.authentication.k8s.io/v1beta1",
  "kind": "ExecCredential",
  "status": {
    "expirationTimestamp": "2026-10-18T12:15:00Z",
    "token": "k8s-aws-v1.aHR0cHM6Ly9leGFtcGxl"
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_round_trip() {
        let cred = sample();
        let parsed = ExecCredential::from_json(&cred.to_pretty_json().unwrap()).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn test_new_truncates_subseconds() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap() + Duration::milliseconds(999);
        let cred = ExecCredential::new("t".into(), t);
        assert_eq!(format_timestamp(cred.expires_at()), "2026-01-01T00:00:05Z");
    }

    #[test]
    fn test_accepts_offset_timestamps() {
        let json = r#"{"apiVersion":"client.authentication.k8s.io/v1beta1","kind":"ExecCredential",
            "status":{"expirationTimestamp":"2026-10-18T14:15:00+02:00","token":"k8s-aws-v1.x"}}"#;
        let cred = ExecCredential::from_json(json).unwrap();
        assert_eq!(format_timestamp(cred.expires_at()), "2026-10-18T12:15:00Z");
    }

    #[rstest]
    #[case::missing_token(r#"{"apiVersion":"a","kind":"b","status":{"expirationTimestamp":"2026-10-18T12:15:00Z"}}"#)]
    #[case::missing_expiration(r#"{"apiVersion":"a","kind":"b","status":{"token":"t"}}"#)]
    #[case::bad_timestamp(r#"{"apiVersion":"a","kind":"b","status":{"expirationTimestamp":"tomorrow","token":"t"}}"#)]
    #[case::empty("")]
    fn test_partial_artifacts_are_rejected(#[case] json: &str) {
        assert!(ExecCredential::from_json(json).is_err());
    }

    #[rstest]
    #[case::far_future(600, true)]
    #[case::just_over_margin(31, true)]
    #[case::exactly_margin(30, false)]
    #[case::inside_margin(10, false)]
    #[case::expired(-60, false)]
    fn test_is_valid_at(#[case] remaining_secs: i64, #[case] valid: bool) {
        let cred = sample();
        let now = cred.expires_at() - Duration::seconds(remaining_secs);
        assert_eq!(cred.is_valid_at(now, Duration::seconds(30)), valid);
    }

    #[test]
    fn test_schema_check() {
        let mut cred = sample();
        assert!(cred.has_expected_schema());
        cred.kind = "Secret".into();
        assert!(!cred.has_expected_schema());
    }

    #[rstest]
    #[case::no_prefix("aHR0cHM6Ly9leGFtcGxl")]
    #[case::other_prefix("k8s-aws-v2.aHR0cHM6Ly9leGFtcGxl")]
    #[case::prefix_only("k8s-aws-v1.")]
    #[case::empty("")]
    fn test_schema_requires_prefixed_token(#[case] token: &str) {
        let mut cred = sample();
        cred.status.token = token.to_string();
        assert!(!cred.has_expected_schema());
    }
}
