use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，区分致命的连接失败与单周期可恢复的抓取失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - `Connect` 与 `Exhausted` 仅在启动阶段出现，视为致命；
///   其余变体由轮询循环按周期恢复。
#[derive(Error, Debug)]
pub enum MarketError {
    // 未建立会话或会话建立失败
    #[error("Connection error: {0}")]
    Connect(String),
    // 重试预算耗尽，进程不应在无会话的情况下继续
    #[error("Connection attempts exhausted after {0} tries")]
    Exhausted(u32),
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 行情源未返回任何 K 线
    #[error("No candles returned for {0}")]
    NoData(String),
}
