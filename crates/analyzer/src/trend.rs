use sinaleiro_core::common::Asset;
use sinaleiro_core::market::entity::Candle;
use sinaleiro_core::signal::entity::{Analysis, AnalyzerMode, Direction, Signal};
use sinaleiro_core::signal::port::Analyzer;

/// # Summary
/// 趋势确认分析器：尾部连续 `lookback` 根同向强势 K 线即产出信号。
///
/// # Invariants
/// - `min_body_ratio` 为强势 K 线的最小实体占比，0 表示不做强度过滤。
/// - 无 I/O 的纯函数实现，同一窗口永远产出同一结果。
pub struct TrendAnalyzer {
    // 要求连续同向的 K 线数量
    lookback: usize,
    // 强势 K 线的最小实体占比
    min_body_ratio: f64,
}

impl TrendAnalyzer {
    /// 构造趋势确认分析器
    pub fn new(lookback: usize, min_body_ratio: f64) -> Self {
        Self {
            lookback,
            min_body_ratio,
        }
    }

    /// # Summary
    /// 判断 K 线是否足够强势。
    ///
    /// # Logic
    /// 1. 未启用过滤（占比为 0）时一律视为强势。
    /// 2. 启用时要求全幅大于零且实体不低于全幅的指定占比，
    ///    以剔除犹豫不决的十字星类 K 线。
    fn is_strong(&self, candle: &Candle) -> bool {
        if self.min_body_ratio <= 0.0 {
            return true;
        }
        candle.range() > 0.0 && candle.body() >= self.min_body_ratio * candle.range()
    }
}

impl Analyzer for TrendAnalyzer {
    fn mode(&self) -> AnalyzerMode {
        AnalyzerMode::TrendConfirmation
    }

    /// # Summary
    /// 对窗口尾部执行趋势确认分析。
    ///
    /// # Logic
    /// 1. 窗口不足 `lookback` 根时返回诊断原因而非错误。
    /// 2. 尾部全部为强势阳线产出 CALL，全部为强势阴线产出 PUT。
    /// 3. 方向混杂或存在弱势 K 线时无信号。
    fn analyze(&self, asset: &Asset, window: &[Candle]) -> Analysis {
        if self.lookback == 0 || window.len() < self.lookback {
            return Analysis::NoSignal("candles insuficientes".to_string());
        }

        let tail = &window[window.len() - self.lookback..];
        let bullish = tail.iter().all(|c| c.is_bullish() && self.is_strong(c));
        let bearish = tail.iter().all(|c| c.is_bearish() && self.is_strong(c));

        let Some(last) = tail.last() else {
            return Analysis::NoSignal("candles insuficientes".to_string());
        };

        if bullish {
            return Analysis::Signal(Signal {
                direction: Direction::Call,
                reason: format!("{} velas fortes consecutivas de alta", self.lookback),
                asset: asset.symbol.clone(),
                source_candle: last.time,
            });
        }
        if bearish {
            return Analysis::Signal(Signal {
                direction: Direction::Put,
                reason: format!("{} velas fortes consecutivas de baixa", self.lookback),
                asset: asset.symbol.clone(),
                source_candle: last.time,
            });
        }

        Analysis::NoSignal("sem tendência clara".to_string())
    }
}
