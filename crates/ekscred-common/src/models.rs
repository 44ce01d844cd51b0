//! 数据模型模块
//!
//! 该模块定义了 ekscred 使用的核心数据模型：缓存的凭证工件、
//! Bearer 令牌、缓存键以及一次调用的请求上下文。

pub mod cache_key;
pub mod exec_credential;
pub mod request;
pub mod token;
