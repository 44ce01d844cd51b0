//! 错误处理模块
//!
//! 该模块提供 ekscred 的统一错误类型。缓存未命中不是错误，不在此列；
//! 这里只包含会导致本次调用以非零状态退出的失败。

use std::io;
use thiserror::Error;

/// ekscred 统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 输入错误（集群、区域或 profile 缺失/无效）
    #[error("输入错误: {0}")]
    Input(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 令牌签发错误（凭证解析失败、签名失败）
    #[error("令牌签发错误: {0}")]
    Issuance(String),

    /// 存储错误（目录创建失败、写入失败）
    #[error("存储错误: {0}")]
    Storage(String),

    /// kubeconfig 加载错误
    #[error("kubeconfig 错误: {0}")]
    Kubeconfig(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// JSON 错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// ekscred 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;

/// 从字符串创建错误
pub trait IntoError<T> {
    /// 将当前类型转换为错误
    fn into_error(self, kind: fn(String) -> Error) -> Result<T>;
}

impl<T> IntoError<T> for String {
    fn into_error(self, kind: fn(String) -> Error) -> Result<T> {
        Err(kind(self))
    }
}

impl<T> IntoError<T> for &str {
    fn into_error(self, kind: fn(String) -> Error) -> Result<T> {
        Err(kind(self.to_string()))
    }
}
