use crate::common::TimeFrame;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// 全局应用配置。启动时一次性读入，运行期间不再变更。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub broker: BrokerConfig,
    pub telegram: TelegramConfig,
    pub trading: TradingConfig,
}

/// 行情源连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub backoff: BackoffConfig,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.broker.example".to_string(),
            email: String::new(),
            password: String::new(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// 连接重试的指数退避参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    // 首次重试前的基础延迟（秒）
    pub base_delay_secs: u64,
    // 每次失败后延迟的放大倍数
    pub multiplier: u32,
    // 单次延迟上限（秒）
    pub max_delay_secs: u64,
    // 叠加的随机抖动上限（秒）
    pub jitter_secs: u64,
    // 最大尝试次数，耗尽后视为致命失败
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 5,
            multiplier: 2,
            max_delay_secs: 300,
            jitter_secs: 3,
            max_attempts: 8,
        }
    }
}

/// Telegram 推送目标配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// 信号检测与调度参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    // K 线周期
    pub candle_interval: TimeFrame,
    // 每次抓取的窗口长度（支撑/阻力与均线都在此窗口内计算）
    pub lookback_candles: usize,
    // 轮询间隔（秒）
    pub poll_interval_secs: u64,
    // 通知提前量（分钟，相对下一根 K 线开盘）
    pub notify_lead_min: i64,
    // 趋势确认模式要求的连续同向 K 线数量
    pub trend_lookback: usize,
    // 强势 K 线的最小实体占比（0 表示不过滤）
    pub min_body_ratio: f64,
    // 会话选择使用的本地时区偏移（小时）
    pub utc_offset_hours: i32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            candle_interval: TimeFrame::Minute5,
            lookback_candles: 30,
            poll_interval_secs: 20,
            notify_lead_min: 1,
            trend_lookback: 3,
            min_body_ratio: 0.0,
            utc_offset_hours: -3, // America/Sao_Paulo（原始部署时区）
        }
    }
}

impl TradingConfig {
    /// K 线周期对应的时长
    pub fn candle_duration(&self) -> chrono::Duration {
        self.candle_interval.as_duration()
    }

    /// 通知提前量对应的时长
    pub fn lead_time(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.notify_lead_min)
    }

    /// 会话判定与文案渲染使用的固定时区偏移
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.trading.candle_interval, TimeFrame::Minute5);
        assert_eq!(config.trading.lookback_candles, 30);
        assert_eq!(config.trading.poll_interval_secs, 20);
        assert_eq!(config.trading.notify_lead_min, 1);
        assert_eq!(config.broker.backoff.max_attempts, 8);
        assert_eq!(config.trading.min_body_ratio, 0.0);
        assert_eq!(config.trading.utc_offset_hours, -3);
    }

    #[test]
    fn test_lead_time_and_interval() {
        let trading = TradingConfig::default();
        assert_eq!(trading.candle_duration(), chrono::Duration::minutes(5));
        assert_eq!(trading.lead_time(), chrono::Duration::minutes(1));
        assert_eq!(trading.utc_offset().local_minus_utc(), -3 * 3600);
    }
}
