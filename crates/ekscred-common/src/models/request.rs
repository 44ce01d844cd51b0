//! 请求上下文模型
//!
//! 一次 `get-token` 调用所需的全部输入：集群名、区域和 AWS profile。
//! 以显式参数传递给缓存与签发组件，不使用进程级全局状态。

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, IntoError, Result};

/// 读取 profile 的环境变量
pub const PROFILE_ENV: &str = "AWS_PROFILE";

/// 令牌请求上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// EKS 集群名
    pub cluster_name: String,
    /// AWS 区域
    pub region: String,
    /// AWS profile
    pub profile: String,
}

impl TokenRequest {
    /// 创建并校验请求上下文
    pub fn new(cluster_name: &str, region: &str, profile: Option<&str>) -> Result<Self> {
        if cluster_name.trim().is_empty() {
            return "集群名称不能为空".into_error(Error::Input);
        }
        if region.trim().is_empty() {
            return "区域不能为空".into_error(Error::Input);
        }
        let profile = match profile {
            Some(p) if !p.trim().is_empty() => p,
            _ => return format!("必须设置 {} 环境变量", PROFILE_ENV).into_error(Error::Input),
        };

        Ok(Self {
            cluster_name: cluster_name.to_string(),
            region: region.to_string(),
            profile: profile.to_string(),
        })
    }

    /// 从 `AWS_PROFILE` 读取 profile 并创建请求上下文
    pub fn from_env(cluster_name: &str, region: &str) -> Result<Self> {
        let profile = env::var(PROFILE_ENV).ok();
        debug!("从环境变量读取 profile: {:?}", profile);
        Self::new(cluster_name, region, profile.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_valid_request() {
        let req = TokenRequest::new("prod", "eu-west-1", Some("admin")).unwrap();
        assert_eq!(req.cluster_name, "prod");
        assert_eq!(req.region, "eu-west-1");
        assert_eq!(req.profile, "admin");
    }

    #[test]
    fn test_missing_inputs_are_input_errors() {
        for (cluster, region, profile) in [
            ("", "eu-west-1", Some("admin")),
            ("prod", " ", Some("admin")),
            ("prod", "eu-west-1", None),
            ("prod", "eu-west-1", Some("")),
        ] {
            let result = TokenRequest::new(cluster, region, profile);
            assert!(matches!(result, Err(Error::Input(_))), "{:?}", result);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_profile() {
        env::set_var(PROFILE_ENV, "from-env");
        let req = TokenRequest::from_env("prod", "us-east-1").unwrap();
        env::remove_var(PROFILE_ENV);
        assert_eq!(req.profile, "from-env");
    }

    #[test]
    #[serial]
    fn test_from_env_without_profile_fails() {
        env::remove_var(PROFILE_ENV);
        let err = TokenRequest::from_env("prod", "us-east-1").unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(err.to_string().contains(PROFILE_ENV));
    }
}
