use crate::common::Asset;
use crate::market::entity::Candle;
use crate::signal::entity::{Analysis, AnalyzerMode};

/// # Summary
/// 形态分析器接口定义。实现必须是无 I/O 的纯函数：
/// 同一窗口输入永远产出同一结果。
///
/// # Invariants
/// - 窗口按时间升序排列，最新 K 线在尾部。
/// - 窗口长度不足时返回 `Analysis::NoSignal` 并附带原因，而非错误。
pub trait Analyzer: Send + Sync {
    /// 返回该分析器对应的模式标识
    fn mode(&self) -> AnalyzerMode;

    /// # Summary
    /// 对给定 K 线窗口执行一次形态分析。
    ///
    /// # Arguments
    /// * `asset`: 窗口所属资产。
    /// * `window`: 规范化 K 线窗口，最新在尾部。
    ///
    /// # Returns
    /// * 命中返回 `Analysis::Signal`，未命中返回 `Analysis::NoSignal(原因)`。
    fn analyze(&self, asset: &Asset, window: &[Candle]) -> Analysis;
}
