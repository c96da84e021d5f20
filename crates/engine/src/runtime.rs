use crate::message::render_alert;
use crate::scheduler::SignalScheduler;
use sinaleiro_analyzer::session::Schedule;
use sinaleiro_core::common::time::TimeProvider;
use sinaleiro_core::config::TradingConfig;
use sinaleiro_core::market::error::MarketError;
use sinaleiro_core::market::port::CandleSource;
use sinaleiro_core::notify::port::Notifier;
use sinaleiro_core::signal::entity::{Analysis, AnalyzerMode, PendingNotification};
use sinaleiro_core::signal::port::Analyzer;
use sinaleiro_feed::normalize::normalize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// # Summary
/// 轮询循环：进程唯一的长生命周期控制流。
/// 每个固定间隔执行一次 会话选择 → 抓取 → 规范化 → 分析 → 调度，
/// 并持有进程唯一的调度器状态。
///
/// # Invariants
/// - 单逻辑线程：不存在并发迭代，调度器状态只被本循环触碰。
/// - 单次迭代内的抓取/规范化/分析失败被就地恢复为"本周期无信号"，
///   绝不终止循环。
/// - 协作式停止信号在每次迭代顶部检查。
pub struct PollLoop {
    // 行情源（已建立会话）
    source: Arc<dyn CandleSource>,
    // 通知通道
    notifier: Arc<dyn Notifier>,
    // 注入的时钟
    clock: Arc<dyn TimeProvider>,
    // 交易时段表
    schedule: Schedule,
    // 可用的分析器集合，按模式匹配
    analyzers: Vec<Arc<dyn Analyzer>>,
    // 进程唯一的调度器状态
    scheduler: SignalScheduler,
    // 检测与调度参数
    config: TradingConfig,
}

impl PollLoop {
    /// # Summary
    /// 构造轮询循环。
    ///
    /// # Arguments
    /// * `source`: 已连接的行情源。
    /// * `notifier`: 通知通道实现。
    /// * `clock`: 时间供给器（测试注入虚拟时钟）。
    /// * `schedule`: 交易时段表。
    /// * `analyzers`: 分析器集合。
    /// * `config`: 检测与调度参数。
    pub fn new(
        source: Arc<dyn CandleSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn TimeProvider>,
        schedule: Schedule,
        analyzers: Vec<Arc<dyn Analyzer>>,
        config: TradingConfig,
    ) -> Self {
        let scheduler = SignalScheduler::new(config.candle_duration(), config.lead_time());
        Self {
            source,
            notifier,
            clock,
            schedule,
            analyzers,
            scheduler,
            config,
        }
    }

    /// 调度器状态只读视图（测试断言用）
    pub fn scheduler(&self) -> &SignalScheduler {
        &self.scheduler
    }

    /// # Summary
    /// 持续运行轮询循环，直到停止信号触发。
    ///
    /// # Logic
    /// 1. 按配置间隔建立定时器，错过的 tick 顺延而非补发。
    /// 2. 每次迭代顶部与定时器一起监听停止信号。
    /// 3. 单周期错误记录日志后继续下一周期。
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_s = self.config.poll_interval_secs,
            "Poll loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Poll loop shutting down");
                    break;
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.run_cycle().await {
                warn!(error = %e, "Poll cycle failed, treating as no signal");
            }
        }
    }

    /// # Summary
    /// 执行单个轮询周期。独立成公开方法，使时序行为可以在
    /// 虚拟时钟下被确定性测试，无需真实等待。
    ///
    /// # Logic
    /// 1. 按部署时区解析当前交易时段，无时段直接空转。
    /// 2. 抓取并规范化 K 线窗口，按时段模式选择分析器。
    /// 3. 新鲜信号武装调度器（重复信号被抑制）；
    ///    未武装时检查是否有到期通知需要派发；
    ///    两者皆无则记录诊断原因。
    pub async fn run_cycle(&mut self) -> Result<(), MarketError> {
        let now = self.clock.now();
        let local_now = now.with_timezone(&self.config.utc_offset());

        let Some(rule) = self.schedule.select(local_now) else {
            info!("Outside trading hours, idling until the next window");
            return Ok(());
        };
        let asset = rule.asset.clone();
        let mode = rule.mode;

        let raw = self
            .source
            .fetch_candles(
                &asset,
                self.config.candle_interval,
                self.config.lookback_candles,
                now,
            )
            .await?;
        let window = normalize(&raw);

        let analysis = match self.analyzer_for(mode) {
            Some(analyzer) => analyzer.analyze(&asset, &window),
            None => {
                error!(?mode, "No analyzer registered for session mode");
                Analysis::NoSignal(format!("analisador indisponível para {mode:?}"))
            }
        };

        let no_signal_reason = match analysis {
            Analysis::Signal(signal) => {
                let source_candle = signal.source_candle;
                if let Some(pending) = self.scheduler.admit(signal) {
                    info!(
                        asset = %asset,
                        direction = %pending.signal.direction,
                        reason = %pending.signal.reason,
                        entry = %pending.entry_time,
                        send_at = %pending.send_at,
                        "Signal armed"
                    );
                    // 本周期已武装，派发检查留给后续周期
                    return Ok(());
                }
                debug!(candle = %source_candle, "Duplicate signal for same candle suppressed");
                "sinal repetido para a mesma vela".to_string()
            }
            Analysis::NoSignal(reason) => reason,
        };

        if let Some(due) = self.scheduler.take_due(now) {
            self.dispatch(due).await;
        } else {
            info!(asset = %asset, reason = %no_signal_reason, "No signal this cycle");
        }

        Ok(())
    }

    /// 按模式查找已注册的分析器
    fn analyzer_for(&self, mode: AnalyzerMode) -> Option<&Arc<dyn Analyzer>> {
        self.analyzers.iter().find(|a| a.mode() == mode)
    }

    /// # Summary
    /// 派发一条到期通知。
    ///
    /// # Logic
    /// 1. 渲染推送文案并发送。
    /// 2. 发送失败仅记录日志：槽位已被 `take_due` 清空，
    ///    不重发，未送达的消息按设计丢弃。
    async fn dispatch(&self, due: PendingNotification) {
        let (subject, content) =
            render_alert(&due, self.config.candle_interval, self.config.utc_offset());

        match self.notifier.notify(&subject, &content).await {
            Ok(()) => {
                info!(
                    asset = %due.signal.asset,
                    direction = %due.signal.direction,
                    entry = %due.entry_time,
                    "Signal alert delivered"
                );
            }
            Err(e) => {
                error!(
                    asset = %due.signal.asset,
                    error = %e,
                    "Signal alert delivery failed, message dropped"
                );
            }
        }
    }
}
