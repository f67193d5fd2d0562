use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use pdf_quiz_generator::utils::logging::log_startup;
use pdf_quiz_generator::{router, AppState, Config, QuizService};

/// 应用主结构
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let state = AppState::new(QuizService::new(config.clone()));

        Ok(Self { config, state })
    }

    /// 运行 HTTP 服务，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("无法监听地址 {}", address))?;
        info!("✅ 服务已就绪: http://{}", address);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // 无法注册信号处理时一直运行
        std::future::pending::<()>().await;
    }
}
