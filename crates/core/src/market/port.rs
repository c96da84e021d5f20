use crate::common::{Asset, TimeFrame};
use crate::market::entity::RawCandle;
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// # Summary
/// 行情源接口定义。实现方持有与数据提供商的会话，
/// 负责建立连接并按需抓取原始 K 线窗口。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持注入到异步运行时。
/// - `fetch_candles` 返回的记录保持行情源给出的时间顺序（最新在尾部）。
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// # Summary
    /// 建立与行情源的会话。
    ///
    /// # Logic
    /// 1. 按实现方的重试策略尝试建立会话。
    /// 2. 重试预算耗尽时返回 `MarketError::Exhausted`。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`，此后 `fetch_candles` 可用。
    /// * 失败返回 `Err(MarketError)`。
    async fn connect(&self) -> Result<(), MarketError>;

    /// # Summary
    /// 抓取指定资产截至 `as_of` 的最近 `count` 根原始 K 线。
    ///
    /// # Arguments
    /// * `asset`: 交易标的。
    /// * `timeframe`: K 线周期。
    /// * `count`: 期望的窗口长度。
    /// * `as_of`: 窗口右端点时间。
    ///
    /// # Returns
    /// * 成功返回原始 K 线列表，失败返回 `MarketError`。
    ///   行情源返回空列表视为 `MarketError::NoData`。
    async fn fetch_candles(
        &self,
        asset: &Asset,
        timeframe: TimeFrame,
        count: usize,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError>;
}
