use std::sync::Arc;

use sinaleiro_analyzer::confluence::ConfluenceAnalyzer;
use sinaleiro_analyzer::session::Schedule;
use sinaleiro_analyzer::trend::TrendAnalyzer;
use sinaleiro_core::common::time::RealTimeProvider;
use sinaleiro_core::config::AppConfig;
use sinaleiro_core::market::port::CandleSource;
use sinaleiro_core::signal::port::Analyzer;
use sinaleiro_engine::runtime::PollLoop;
use sinaleiro_feed::broker::BrokerClient;
use sinaleiro_notify::telegram::TelegramNotifier;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 从可选配置文件与环境变量加载应用配置。
///
/// # Logic
/// 1. `sinaleiro.toml` 存在则读取，缺失时退回默认值。
/// 2. `SINALEIRO_` 前缀的环境变量覆盖文件配置（`__` 作层级分隔）。
fn load_config() -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("sinaleiro").required(false))
        .add_source(config::Environment::with_prefix("SINALEIRO").separator("__"))
        .build()?
        .try_deserialize()
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 PollLoop。
///
/// # Logic
/// 1. 初始化全局日志与 TLS Provider。
/// 2. 加载配置。
/// 3. 实例化基础设施层（行情源、通知器）并建立行情会话，
///    重试耗尽视为致命错误直接退出。
/// 4. 构造分析器与时段表，组装轮询循环并启动。
/// 5. 挂起等待外部信号，触发协作式停机。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志与 TLS Provider
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;
    info!("Sinaleiro starting...");

    // 2. 加载配置
    let config = load_config()?;

    // 3. 实例化基础设施层并建立行情会话（失败即退出）
    let source = Arc::new(BrokerClient::new(config.broker.clone()));
    source.connect().await?;

    let notifier = Arc::new(TelegramNotifier::new(
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
    ));

    // 4. 构造分析器、时段表与轮询循环
    let analyzers: Vec<Arc<dyn Analyzer>> = vec![
        Arc::new(TrendAnalyzer::new(
            config.trading.trend_lookback,
            config.trading.min_body_ratio,
        )),
        Arc::new(ConfluenceAnalyzer::new(config.trading.lookback_candles)),
    ];
    let poll = PollLoop::new(
        source,
        notifier,
        Arc::new(RealTimeProvider),
        Schedule::default_rules(),
        analyzers,
        config.trading.clone(),
    );

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(poll.run(shutdown.clone()));
    info!("Poll loop running. Waiting for shutdown signal...");

    // 5. 挂起主线程，等待外部退出信号
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping poll loop...");
    shutdown.cancel();
    handle.await?;
    info!("Exited cleanly");

    Ok(())
}
