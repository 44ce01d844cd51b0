//! ekscred - EKS exec 凭证插件
//!
//! 该模块实现 kubectl 的 exec 凭证插件：为 EKS 集群生成基于 STS 预签名 URL 的
//! Bearer 令牌，并按集群缓存在本地磁盘，避免重复的网络请求和签名操作。

pub mod cache;
pub mod cli;
pub mod config;
pub mod issuer;
pub mod kubeconfig;
pub mod provider;
pub mod utils;

pub use provider::{IssuedToken, TokenProvider, TokenSource};

use ekscred_common::{Result, TokenRequest};
use tracing::info;

use crate::cli::{GetTokenArgs, ShowArgs};
use crate::config::Settings;

/// 执行 `eks get-token`
///
/// 先从环境中解析 profile，失败时不会触碰缓存或网络。
pub async fn get_token(args: &GetTokenArgs, settings: &Settings) -> Result<IssuedToken> {
    let request = TokenRequest::from_env(&args.cluster_name, &args.region)?;

    let cache = cache::create_cache(settings)?;
    let issuer = issuer::create_default_issuer(settings);
    let provider = TokenProvider::new(cache, issuer, settings.partition_by_profile);

    let issued = provider.get_token(&request).await?;
    info!(
        "集群 {} 的令牌已就绪（来源: {:?}）",
        request.cluster_name, issued.source
    );
    Ok(issued)
}

/// 执行 `kubeconfig show`，返回渲染好的表格
pub fn show_kubeconfig(args: &ShowArgs) -> Result<String> {
    let config = kubeconfig::load(args.kubeconfig.as_deref())?;
    let rows = kubeconfig::context_rows(&config);
    Ok(kubeconfig::render_table(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use ekscred_common::{Error, PROFILE_ENV};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_missing_profile_fails_before_touching_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let settings = Settings {
            cache_dir: Some(cache_dir.clone()),
            ..Settings::default()
        };
        let args = GetTokenArgs {
            region: "us-east-1".to_string(),
            cluster_name: "prod".to_string(),
            output: OutputFormat::Json,
        };

        std::env::remove_var(PROFILE_ENV);
        let err = get_token(&args, &settings).await.unwrap_err();

        assert!(matches!(err, Error::Input(_)));
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_show_kubeconfig_renders_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            "apiVersion: v1\nkind: Config\ncurrent-context: dev\nclusters: []\nusers: []\ncontexts:\n  - name: dev\n    context:\n      cluster: dev\n      user: dev\n",
        )
        .unwrap();

        let table = show_kubeconfig(&ShowArgs {
            kubeconfig: Some(path),
        })
        .unwrap();
        assert!(table.contains("| *dev"));
        assert!(table.contains("(not found)"));
    }
}
