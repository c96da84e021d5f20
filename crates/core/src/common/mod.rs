use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// # Summary
/// 交易标的实体，代表信号系统当前监控的资产（外汇对或其 OTC 变体）。
///
/// # Invariants
/// - `symbol` 必须是行情源可识别的资产代码。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Asset {
    // 资产代码 (例如: EURUSD, EURUSD-OTC)
    pub symbol: String,
}

impl Asset {
    /// 根据资产代码构造标的实体
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// # Summary
/// 交易时间周期枚举，定义 K 线的时间跨度。
///
/// # Invariants
/// - 无特定约束。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 1小时
    Hour1,
}

impl TimeFrame {
    /// 返回该周期对应的秒数
    pub fn as_secs(&self) -> i64 {
        match self {
            TimeFrame::Minute1 => 60,
            TimeFrame::Minute5 => 300,
            TimeFrame::Minute15 => 900,
            TimeFrame::Hour1 => 3600,
        }
    }

    /// 返回该周期对应的 chrono 时长
    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.as_secs())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute1" => Ok(TimeFrame::Minute1),
            "5m" | "minute5" => Ok(TimeFrame::Minute5),
            "15m" | "minute15" => Ok(TimeFrame::Minute15),
            "1h" | "hour1" => Ok(TimeFrame::Hour1),
            _ => Err(format!("Unknown TimeFrame: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFrame::Minute1 => write!(f, "1M"),
            TimeFrame::Minute5 => write!(f, "5M"),
            TimeFrame::Minute15 => write!(f, "15M"),
            TimeFrame::Hour1 => write!(f, "1H"),
        }
    }
}
