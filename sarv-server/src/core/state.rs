use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::SessionService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是每个请求处理函数拿到的数据访问句柄：显式构造、按请求注入，
/// 不存在全局单例。使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | session_service | Arc<SessionService> | 会话令牌服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 会话令牌服务 (Arc 共享所有权)
    pub session_service: Arc<SessionService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试场景常用)
    pub fn new(config: Config, db: DbService, session_service: Arc<SessionService>) -> Self {
        Self {
            config,
            db,
            session_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/sarv.db) 与迁移
    /// 3. 管理员账户播种 (ADMIN_PHONE / ADMIN_PASSWORD)
    /// 4. 会话服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("sarv.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;
        db.ensure_admin_account().await?;

        let session_service = Arc::new(SessionService::default());

        Ok(Self::new(config.clone(), db, session_service))
    }

    /// 内存数据库状态，供测试使用
    pub async fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new_in_memory().await?;
        let session_service = Arc::new(SessionService::default());
        Ok(Self::new(config.clone(), db, session_service))
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取会话服务
    pub fn session_service(&self) -> Arc<SessionService> {
        self.session_service.clone()
    }
}
