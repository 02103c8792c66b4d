use sarv_server::{Config, Server, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    print_banner();

    // 2. 加载配置并初始化日志
    let config = Config::from_env();
    let logs_dir = config.logs_dir();
    sarv_server::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        logs_dir.to_str(),
    );

    tracing::info!("Sarv server starting...");

    // 3. 启动 HTTP 服务器
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
