//! 工具模块
//!
//! - [`error`] - 统一错误类型和响应
//! - [`logger`] - 日志初始化
//! - [`ids`] - 时间戳和雪花 ID
//! - [`phone`] - 电话号码规范化
//! - [`slug`] - 在线菜单分享链接
//! - [`validation`] - 输入校验辅助函数

pub mod error;
pub mod ids;
pub mod logger;
pub mod phone;
pub mod slug;
pub mod validation;

pub use error::{AppError, AppResult};
pub use ids::{now_millis, snowflake_id};
