//! ekscred Common - 跨模块共享的数据结构
//!
//! 该模块提供 ekscred 各组件共享的数据模型和错误处理机制，
//! 包括 ExecCredential 凭证、Bearer 令牌编码、缓存键以及请求上下文。

pub mod models;
pub mod error;

/// 重新导出常用类型，方便使用
pub use error::Error;
pub use error::Result;
pub use error::IntoError;
pub use models::cache_key::*;
pub use models::exec_credential::*;
pub use models::request::*;
pub use models::token::*;
