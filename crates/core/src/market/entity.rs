use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 行情源返回的原始 K 线记录。字段名因数据源版本而异（别名解析见 feed 层），
/// 在进入规范化边界之前保持松散类型。
pub type RawCandle = serde_json::Map<String, serde_json::Value>;

/// # Summary
/// 单根规范化 K 线数据实体，记录特定时段内的行情波动。
/// 由规范化边界一次性产出，之后不可变；本周期消费完毕即丢弃，不做持久化。
///
/// # Invariants
/// - `high` 必须大于或等于 `open`, `close`。
/// - `low` 必须小于或等于 `open`, `close`。
/// - 违反以上约束的记录视为畸形输入，在规范化边界被丢弃。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
}

impl Candle {
    /// 实体部分（开收盘价差的绝对值）
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// 全幅（最高价减最低价）
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// 上影线长度
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// 下影线长度
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// 是否为阳线（收盘价严格高于开盘价）
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 是否为阴线（收盘价严格低于开盘价）
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// # Summary
    /// 校验 K 线形态约束是否成立。
    ///
    /// # Logic
    /// 1. `high` 不得低于实体上沿。
    /// 2. `low` 不得高于实体下沿。
    ///
    /// # Returns
    /// 约束均成立返回 true。
    pub fn is_well_formed(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}
