use crate::common::{Asset, TimeFrame};
use crate::market::entity::{Candle, RawCandle};
use crate::market::error::MarketError;
use crate::market::port::CandleSource;
use crate::notify::error::NotifyError;
use crate::notify::port::Notifier;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// 构造一根规范化 K 线（测试辅助）
pub fn candle_at(epoch: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        time: Utc.timestamp_opt(epoch, 0).unwrap(),
        open,
        high,
        low,
        close,
    }
}

/// 构造一条携带标准字段名的原始 K 线记录（测试辅助）
pub fn raw_candle(epoch: i64, open: f64, high: f64, low: f64, close: f64) -> RawCandle {
    let mut map = RawCandle::new();
    map.insert("open".into(), open.into());
    map.insert("high".into(), high.into());
    map.insert("low".into(), low.into());
    map.insert("close".into(), close.into());
    map.insert("from".into(), epoch.into());
    map
}

/// # Summary
/// 脚本化行情源：按预先排好的批次依次吐出原始 K 线，
/// 批次耗尽后返回 `MarketError::NoData`。
pub struct ScriptedCandleSource {
    batches: Mutex<VecDeque<Vec<RawCandle>>>,
}

impl ScriptedCandleSource {
    pub fn new(batches: Vec<Vec<RawCandle>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }
}

#[async_trait]
impl CandleSource for ScriptedCandleSource {
    async fn connect(&self) -> Result<(), MarketError> {
        Ok(())
    }

    async fn fetch_candles(
        &self,
        asset: &Asset,
        _timeframe: TimeFrame,
        _count: usize,
        _as_of: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError> {
        match self.batches.lock().await.pop_front() {
            Some(batch) => Ok(batch),
            None => Err(MarketError::NoData(asset.symbol.clone())),
        }
    }
}

/// # Summary
/// 始终失败的行情源，用于验证轮询循环的单周期恢复策略。
pub struct FailingCandleSource;

#[async_trait]
impl CandleSource for FailingCandleSource {
    async fn connect(&self) -> Result<(), MarketError> {
        Err(MarketError::Connect("scripted connect failure".into()))
    }

    async fn fetch_candles(
        &self,
        _asset: &Asset,
        _timeframe: TimeFrame,
        _count: usize,
        _as_of: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError> {
        Err(MarketError::Network("scripted fetch failure".into()))
    }
}

/// # Summary
/// 记录型通知器：捕获所有派发的消息供断言，可配置为投递失败。
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// 构造一个所有投递都失败的通知器
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, content: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .await
            .push((subject.to_string(), content.to_string()));
        if self.fail {
            return Err(NotifyError::Network("scripted delivery failure".into()));
        }
        Ok(())
    }
}
