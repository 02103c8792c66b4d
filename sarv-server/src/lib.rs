//! Sarv Server - 多租户咖啡店收银与后台系统
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT 会话 Cookie + Argon2 口令、套餐/角色守卫
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx)、租户隔离的仓储
//! - **HTTP API** (`api`): RESTful 接口，按区域路由 + 路由层守卫
//! - **报表** (`reporting`): 读侧的期间分桶纯折叠
//! - **打印** (`printing`): IPP 打印任务派发
//! - **发票** (`services::invoice`): 尽力而为的 PDF 发票
//!
//! # 模块结构
//!
//! ```text
//! sarv-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 会话、Cookie、守卫
//! ├── db/            # 模型、仓储、迁移
//! ├── api/           # HTTP 路由和处理器
//! ├── reporting/     # 记账聚合
//! ├── printing/      # 打印派发
//! ├── services/      # 发票生成
//! └── utils/         # 错误、日志、ID、号码、slug
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod printing;
pub mod reporting;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::auth::{SessionPayload, SessionService};
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____
  / ___/____ _______   __
  \__ \/ __ `/ ___/ | / /
 ___/ / /_/ / /   | |/ /
/____/\__,_/_/    |___/
    "#
    );
}
