use chrono::FixedOffset;
use sinaleiro_core::common::TimeFrame;
use sinaleiro_core::signal::entity::PendingNotification;

/// # Summary
/// 渲染确认信号的推送文案。
///
/// # Logic
/// 1. 标题固定为确认横幅，由通知器加粗。
/// 2. 正文逐行给出方向、资产、周期、依据与入场时间，
///    入场时间换算到部署时区展示。
/// 3. 尾部附带金损控制与操作建议（沿用原始部署文案）。
///
/// # Arguments
/// * `pending`: 到期的待派发通知。
/// * `timeframe`: K 线周期（用于展示）。
/// * `offset`: 部署时区偏移。
///
/// # Returns
/// `(标题, 正文)` 二元组，直接交给 Notifier 发送。
pub fn render_alert(
    pending: &PendingNotification,
    timeframe: TimeFrame,
    offset: FixedOffset,
) -> (String, String) {
    let subject = "🔔 SINAL CONFIRMADO 🔔".to_string();
    let entry_local = pending.entry_time.with_timezone(&offset);

    let content = format!(
        "\n*Tipo:* {}\n*Ativo:* {}\n*Intervalo:* {}\n*Motivo:* {}\n*Horário da entrada:* {}\n\nATÉ GALE 1\n\n💡 Recomendação: Operar sempre dentro dos horários de maior volatilidade.",
        pending.signal.direction,
        pending.signal.asset,
        timeframe,
        pending.signal.reason,
        entry_local.format("%H:%M:%S"),
    );

    (subject, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sinaleiro_core::signal::entity::{Direction, Signal};

    #[test]
    fn test_render_alert_contents() {
        let entry_time = Utc.with_ymd_and_hms(2026, 8, 8, 18, 5, 0).unwrap();
        let pending = PendingNotification {
            signal: Signal {
                direction: Direction::Call,
                reason: "3 velas fortes consecutivas de alta".to_string(),
                asset: "EURUSD-OTC".to_string(),
                source_candle: entry_time - chrono::Duration::minutes(5),
            },
            entry_time,
            send_at: entry_time - chrono::Duration::minutes(1),
        };

        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let (subject, content) = render_alert(&pending, TimeFrame::Minute5, offset);

        assert_eq!(subject, "🔔 SINAL CONFIRMADO 🔔");
        assert!(content.contains("*Tipo:* CALL"));
        assert!(content.contains("*Ativo:* EURUSD-OTC"));
        assert!(content.contains("*Intervalo:* 5M"));
        assert!(content.contains("*Motivo:* 3 velas fortes consecutivas de alta"));
        // 18:05 UTC 在 UTC-3 时区显示为 15:05:00
        assert!(content.contains("*Horário da entrada:* 15:05:00"));
        assert!(content.contains("ATÉ GALE 1"));
    }
}
