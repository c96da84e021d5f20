use chrono::{DateTime, TimeZone, Utc};
use sinaleiro_core::market::entity::{Candle, RawCandle};
use tracing::warn;

// 各字段按优先级尝试的别名表。行情源的不同版本使用过不同的字段名，
// 统一在此边界一次性解析。
const OPEN_ALIASES: &[&str] = &["open", "o"];
const CLOSE_ALIASES: &[&str] = &["close", "c"];
const HIGH_ALIASES: &[&str] = &["high", "max", "h"];
const LOW_ALIASES: &[&str] = &["low", "min", "l"];
const TIME_ALIASES: &[&str] = &["from", "from_time"];

/// # Summary
/// 将一批松散类型的原始 K 线记录规范化为标准 K 线。
///
/// # Logic
/// 1. 逐条解析，别名按优先级匹配，价格字段整体缺失时默认 0。
/// 2. 强制转换失败（非数值内容）、缺失开始时间或形态约束不成立的
///    记录被丢弃并记录警告，不中断整批处理。
/// 3. 输出保持输入顺序，长度小于等于输入长度。
///
/// # Arguments
/// * `raw`: 行情源返回的原始记录列表。
///
/// # Returns
/// 规范化 K 线列表。部分数据优于整体失败。
pub fn normalize(raw: &[RawCandle]) -> Vec<Candle> {
    let mut out = Vec::with_capacity(raw.len());

    for (index, record) in raw.iter().enumerate() {
        match normalize_record(record) {
            Ok(candle) => {
                if candle.is_well_formed() {
                    out.push(candle);
                } else {
                    warn!(index, time = %candle.time, "Discarding ill-formed candle");
                }
            }
            Err(reason) => {
                warn!(index, %reason, "Failed to normalize candle");
            }
        }
    }

    out
}

/// 规范化单条记录；任何字段强制转换失败立即返回原因
fn normalize_record(record: &RawCandle) -> Result<Candle, String> {
    let open = coerce_price(record, OPEN_ALIASES)?;
    let close = coerce_price(record, CLOSE_ALIASES)?;
    let high = coerce_price(record, HIGH_ALIASES)?;
    let low = coerce_price(record, LOW_ALIASES)?;
    let time = coerce_time(record)?;

    Ok(Candle {
        time,
        open,
        high,
        low,
        close,
    })
}

/// # Summary
/// 按别名优先级提取并强制转换价格字段。
///
/// # Logic
/// 1. 依次查找别名，命中即转换：JSON 数值直接取值，数值字符串解析。
/// 2. 命中但内容不可转换（null、非数值字符串、其他类型）视为失败。
/// 3. 所有别名均缺失时默认 0。
fn coerce_price(record: &RawCandle, aliases: &[&str]) -> Result<f64, String> {
    for key in aliases {
        if let Some(value) = record.get(*key) {
            return match value {
                serde_json::Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| format!("field '{key}' is not representable as f64")),
                serde_json::Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| format!("field '{key}' is not numeric: {s:?}")),
                other => Err(format!("field '{key}' has unsupported type: {other}")),
            };
        }
    }
    Ok(0.0)
}

/// # Summary
/// 提取 K 线开始时间（epoch 秒）。
///
/// # Logic
/// 1. 依次查找时间别名，接受整数或整数字符串。
/// 2. 时间是去重键与入场时间的基准，缺失或不可解析即丢弃该记录。
fn coerce_time(record: &RawCandle) -> Result<DateTime<Utc>, String> {
    for key in TIME_ALIASES {
        if let Some(value) = record.get(*key) {
            let epoch = match value {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .ok_or_else(|| format!("field '{key}' is not an integer timestamp"))?,
                serde_json::Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("field '{key}' is not a timestamp: {s:?}"))?,
                other => return Err(format!("field '{key}' has unsupported type: {other}")),
            };
            return Utc
                .timestamp_opt(epoch, 0)
                .single()
                .ok_or_else(|| format!("field '{key}' is out of range: {epoch}"));
        }
    }
    Err("missing candle open time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(entries: &[(&str, serde_json::Value)]) -> RawCandle {
        let mut map = RawCandle::new();
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        map
    }

    #[test]
    fn test_primary_field_names() {
        let raw = vec![record(&[
            ("open", json!(1.10)),
            ("high", json!(1.12)),
            ("low", json!(1.09)),
            ("close", json!(1.11)),
            ("from", json!(1_700_000_000)),
        ])];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, 1.10);
        assert_eq!(candles[0].high, 1.12);
        assert_eq!(candles[0].low, 1.09);
        assert_eq!(candles[0].close, 1.11);
        assert_eq!(candles[0].time.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_alias_priority_order() {
        // 同时带 "max"/"h" 与 "min"/"l" 时按别名表顺序取值
        let raw = vec![record(&[
            ("o", json!(1.0)),
            ("c", json!(1.2)),
            ("max", json!(1.5)),
            ("h", json!(9.9)),
            ("min", json!(0.5)),
            ("l", json!(0.1)),
            ("from_time", json!(1_700_000_000)),
        ])];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].high, 1.5);
        assert_eq!(candles[0].low, 0.5);
    }

    #[test]
    fn test_missing_prices_default_to_zero() {
        // 价格字段整体缺失的记录保留为全零，而不是丢弃
        let raw = vec![record(&[("from", json!(1_700_000_000))])];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, 0.0);
        assert_eq!(candles[0].high, 0.0);
        assert_eq!(candles[0].low, 0.0);
        assert_eq!(candles[0].close, 0.0);
    }

    #[test]
    fn test_numeric_string_is_coerced() {
        let raw = vec![record(&[
            ("open", json!("1.10")),
            ("high", json!("1.12")),
            ("low", json!("1.09")),
            ("close", json!("1.11")),
            ("from", json!("1700000000")),
        ])];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 1.11);
    }

    #[test]
    fn test_non_numeric_record_is_dropped() {
        let raw = vec![
            record(&[
                ("open", json!("abc")),
                ("high", json!(1.12)),
                ("low", json!(1.09)),
                ("close", json!(1.11)),
                ("from", json!(1_700_000_000)),
            ]),
            record(&[
                ("open", json!(1.10)),
                ("high", json!(1.12)),
                ("low", json!(1.09)),
                ("close", json!(1.11)),
                ("from", json!(1_700_000_300)),
            ]),
        ];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].time.timestamp(), 1_700_000_300);
    }

    #[test]
    fn test_null_price_is_a_coercion_failure() {
        let raw = vec![record(&[
            ("open", json!(null)),
            ("high", json!(1.12)),
            ("low", json!(1.09)),
            ("close", json!(1.11)),
            ("from", json!(1_700_000_000)),
        ])];

        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn test_missing_timestamp_is_dropped() {
        let raw = vec![record(&[
            ("open", json!(1.10)),
            ("high", json!(1.12)),
            ("low", json!(1.09)),
            ("close", json!(1.11)),
        ])];

        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn test_ill_formed_candle_is_dropped() {
        // high 低于实体上沿，违反形态约束
        let raw = vec![record(&[
            ("open", json!(1.10)),
            ("high", json!(1.05)),
            ("low", json!(1.00)),
            ("close", json!(1.11)),
            ("from", json!(1_700_000_000)),
        ])];

        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let raw = vec![
            record(&[
                ("open", json!(1.0)),
                ("high", json!(1.1)),
                ("low", json!(0.9)),
                ("close", json!(1.05)),
                ("from", json!(1_700_000_000)),
            ]),
            record(&[
                ("open", json!(1.05)),
                ("high", json!(1.2)),
                ("low", json!(1.0)),
                ("close", json!(1.15)),
                ("from", json!(1_700_000_300)),
            ]),
        ];

        let candles = normalize(&raw);
        assert_eq!(candles.len(), 2);
        assert!(candles[0].time < candles[1].time);
    }
}
