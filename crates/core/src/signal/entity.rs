use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 信号方向枚举，对应二元期权的看涨/看跌操作。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    // 看涨
    Call,
    // 看跌
    Put,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

/// # Summary
/// 分析器模式枚举，会话选择器据此决定当前时段使用哪种模式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnalyzerMode {
    // 趋势确认模式：连续 K 根同向强势 K 线
    TrendConfirmation,
    // 价格行为合流模式：Price Action + 支撑/阻力 + 均线
    PriceActionConfluence,
}

/// # Summary
/// 交易信号实体，由分析器针对某一 K 线窗口产出。
///
/// # Invariants
/// - `source_candle` 是产生该信号的最新 K 线的开始时间，作为天然去重键。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    // 信号方向
    pub direction: Direction,
    // 产生信号的依据描述（直接进入推送文案）
    pub reason: String,
    // 信号所属资产代码
    pub asset: String,
    // 信号源 K 线的开始时间
    pub source_candle: DateTime<Utc>,
}

/// # Summary
/// 单次分析结果。"无信号"是预期内的正常结果而非错误，
/// 必须携带诊断原因以供轮询循环记录。
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    // 命中信号
    Signal(Signal),
    // 无信号，附带诊断原因
    NoSignal(String),
}

/// # Summary
/// 待派发通知实体。调度器同一时刻最多持有一条（单槽位，非队列），
/// 派发即消费。
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    // 被确认的信号
    pub signal: Signal,
    // 建议入场时间（信号源 K 线的下一根开盘）
    pub entry_time: DateTime<Utc>,
    // 通知派发时间（入场时间减去提前量）
    pub send_at: DateTime<Utc>,
}
