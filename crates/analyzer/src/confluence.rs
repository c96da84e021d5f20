use crate::pattern::{detect_price_action, moving_average, support_resistance};
use sinaleiro_core::common::Asset;
use sinaleiro_core::market::entity::Candle;
use sinaleiro_core::signal::entity::{Analysis, AnalyzerMode, Direction, Signal};
use sinaleiro_core::signal::port::Analyzer;

// 支撑/阻力与均线统一在尾部 20 根 K 线内计算
const DEFAULT_PERIOD: usize = 20;

/// # Summary
/// 价格行为合流分析器：最后两根 K 线的价格行为形态，
/// 叠加支撑/阻力贴近度与均线位置三重确认后才产出信号。
///
/// # Invariants
/// - 任一确认条件缺失即无信号，并携带具体诊断原因。
/// - 无 I/O 的纯函数实现。
pub struct ConfluenceAnalyzer {
    // 分析所需的最小窗口长度
    lookback: usize,
    // 支撑/阻力的计算区间
    sr_period: usize,
    // 移动平均的计算区间
    sma_period: usize,
}

impl ConfluenceAnalyzer {
    /// 构造价格行为合流分析器（支撑/阻力与均线区间取默认 20）
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback,
            sr_period: DEFAULT_PERIOD,
            sma_period: DEFAULT_PERIOD,
        }
    }

    /// 指定全部区间参数构造（测试用）
    pub fn with_periods(lookback: usize, sr_period: usize, sma_period: usize) -> Self {
        Self {
            lookback,
            sr_period,
            sma_period,
        }
    }
}

impl Analyzer for ConfluenceAnalyzer {
    fn mode(&self) -> AnalyzerMode {
        AnalyzerMode::PriceActionConfluence
    }

    /// # Summary
    /// 对窗口执行价格行为合流分析。
    ///
    /// # Logic
    /// 1. 窗口不足 `lookback` 根时返回诊断原因。
    /// 2. 计算尾部区间的阻力位、支撑位与收盘均线。
    /// 3. 检测最后两根 K 线的价格行为形态，无形态即无信号。
    /// 4. CALL 要求最低价贴近支撑（距离不超过当前 K 线半幅）
    ///    且收盘在均线之上；PUT 镜像要求贴近阻力且收盘在均线之下。
    /// 5. 合流不足时返回 "sem confluência suficiente"。
    fn analyze(&self, asset: &Asset, window: &[Candle]) -> Analysis {
        if window.len() < self.lookback {
            return Analysis::NoSignal("candles insuficientes".to_string());
        }

        let (Some((resistance, support)), Some(sma)) = (
            support_resistance(window, self.sr_period),
            moving_average(window, self.sma_period),
        ) else {
            return Analysis::NoSignal("candles insuficientes".to_string());
        };

        let [.., c1, c2] = window else {
            return Analysis::NoSignal("candles insuficientes".to_string());
        };

        let Some((direction, pa_reason)) = detect_price_action(c1, c2) else {
            return Analysis::NoSignal("sem padrão de Price Action".to_string());
        };

        let half_range = 0.5 * c2.range();
        match direction {
            Direction::Call if (c2.low - support).abs() <= half_range && c2.close > sma => {
                Analysis::Signal(Signal {
                    direction,
                    reason: format!("{pa_reason} no suporte + acima da SMA20"),
                    asset: asset.symbol.clone(),
                    source_candle: c2.time,
                })
            }
            Direction::Put if (c2.high - resistance).abs() <= half_range && c2.close < sma => {
                Analysis::Signal(Signal {
                    direction,
                    reason: format!("{pa_reason} na resistência + abaixo da SMA20"),
                    asset: asset.symbol.clone(),
                    source_candle: c2.time,
                })
            }
            _ => Analysis::NoSignal("sem confluência suficiente".to_string()),
        }
    }
}
