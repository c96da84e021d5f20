use sinaleiro_core::market::entity::Candle;
use sinaleiro_core::signal::entity::Direction;

/// # Summary
/// 计算窗口尾部 `period` 根 K 线的阻力位与支撑位。
///
/// # Logic
/// 1. 阻力位取区间内最高价的最大值。
/// 2. 支撑位取区间内最低价的最小值。
/// 3. 窗口短于 `period` 时使用整个窗口。
///
/// # Returns
/// 窗口为空返回 None，否则返回 `(阻力位, 支撑位)`。
pub fn support_resistance(window: &[Candle], period: usize) -> Option<(f64, f64)> {
    let tail = trailing(window, period);
    if tail.is_empty() {
        return None;
    }

    let mut resistance = f64::MIN;
    let mut support = f64::MAX;
    for candle in tail {
        resistance = resistance.max(candle.high);
        support = support.min(candle.low);
    }
    Some((resistance, support))
}

/// 计算窗口尾部 `period` 根 K 线收盘价的简单移动平均
pub fn moving_average(window: &[Candle], period: usize) -> Option<f64> {
    let tail = trailing(window, period);
    if tail.is_empty() {
        return None;
    }

    let sum: f64 = tail.iter().map(|c| c.close).sum();
    let count = u32::try_from(tail.len()).ok()?;
    Some(sum / f64::from(count))
}

/// # Summary
/// 检测最后两根 K 线构成的价格行为形态。
///
/// # Logic
/// 1. 吞没形态：第二根 K 线的实体完全包裹并反转第一根的实体。
/// 2. Pinbar：实体相对全幅很小，单侧影线占主导（主导影线超过
///    实体两倍，另一侧影线小于实体）。
/// 3. 零实体或零幅 K 线不构成任何形态；所有规则只用乘法比较，
///    不存在除零路径。
///
/// # Arguments
/// * `c1`: 倒数第二根 K 线。
/// * `c2`: 最新一根 K 线。
///
/// # Returns
/// 命中返回 `(方向, 形态描述)`，描述文案直接进入推送消息。
pub fn detect_price_action(c1: &Candle, c2: &Candle) -> Option<(Direction, &'static str)> {
    if c2.is_bullish() && c1.is_bearish() && c2.close > c1.open && c2.open < c1.close {
        return Some((Direction::Call, "Engolfo de Alta"));
    }
    if c2.is_bearish() && c1.is_bullish() && c2.close < c1.open && c2.open > c1.close {
        return Some((Direction::Put, "Engolfo de Baixa"));
    }

    let body = c2.body();
    let lower_wick = c2.lower_wick();
    let upper_wick = c2.upper_wick();

    if body > 0.0 && lower_wick > 2.0 * body && upper_wick < body {
        return Some((Direction::Call, "Martelo (Pinbar de Alta)"));
    }
    if body > 0.0 && upper_wick > 2.0 * body && lower_wick < body {
        return Some((Direction::Put, "Estrela Cadente (Pinbar de Baixa)"));
    }

    None
}

/// 取窗口尾部最多 `period` 个元素
fn trailing(window: &[Candle], period: usize) -> &[Candle] {
    let start = window.len().saturating_sub(period);
    &window[start..]
}
