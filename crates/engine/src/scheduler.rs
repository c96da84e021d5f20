use chrono::{DateTime, Duration, Utc};
use sinaleiro_core::signal::entity::{PendingNotification, Signal};

/// # Summary
/// 信号调度器：进程唯一的通知状态机。
/// 把新鲜信号转化为一条定时的、至多一次的待派发通知，
/// 并抑制重复与过期信号。
///
/// # Invariants
/// - 单槽位：任一时刻最多存在一条待派发通知，新信号静默替换旧的未发通知。
/// - 同一 `source_candle` 在进程生命周期内至多触发一次武装
///   （通过 `last_signal_candle` 去重，跨过分析器返回无信号的安静周期）。
/// - `take_due` 在返回的同时清空槽位，派发天然幂等。
/// - 状态不持久化：进程重启即遗忘在途通知。
pub struct SignalScheduler {
    // K 线周期：信号源 K 线开始时间加该周期即入场时间
    candle_interval: Duration,
    // 通知提前量：派发时间为入场时间减该提前量
    lead_time: Duration,
    // 最近一次武装的信号源 K 线时间（去重键）
    last_signal_candle: Option<DateTime<Utc>>,
    // 待派发槽位，IDLE 时为 None，ARMED 时持有一条
    pending: Option<PendingNotification>,
}

impl SignalScheduler {
    /// 构造空闲状态的调度器
    pub fn new(candle_interval: Duration, lead_time: Duration) -> Self {
        Self {
            candle_interval,
            lead_time,
            last_signal_candle: None,
            pending: None,
        }
    }

    /// # Summary
    /// 尝试接纳一条新信号并武装通知。
    ///
    /// # Logic
    /// 1. 信号源 K 线与上次武装相同则为重复信号，直接拒绝。
    /// 2. 计算入场时间（源 K 线 + 周期）与派发时间（入场 − 提前量）。
    /// 3. 覆盖待派发槽位并登记去重键。已武装状态下接纳新信号
    ///    同样成立：新通知替换旧通知，不排队。
    ///
    /// # Arguments
    /// * `signal`: 本周期分析器产出的信号。
    ///
    /// # Returns
    /// 接纳成功返回新武装的通知引用，重复信号返回 None。
    pub fn admit(&mut self, signal: Signal) -> Option<&PendingNotification> {
        if self.last_signal_candle == Some(signal.source_candle) {
            return None;
        }

        let entry_time = signal.source_candle + self.candle_interval;
        let send_at = entry_time - self.lead_time;
        self.last_signal_candle = Some(signal.source_candle);
        self.pending = Some(PendingNotification {
            signal,
            entry_time,
            send_at,
        });
        self.pending.as_ref()
    }

    /// # Summary
    /// 取走到期的待派发通知。
    ///
    /// # Logic
    /// 1. 槽位为空或尚未到派发时间返回 None。
    /// 2. 到期则清空槽位并交出通知，由调用方执行派发副作用。
    ///
    /// # Arguments
    /// * `now`: 当前时间（来自注入的时钟）。
    ///
    /// # Returns
    /// 到期返回通知（槽位同步清空），否则返回 None。
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<PendingNotification> {
        if self.pending.as_ref().is_some_and(|p| now >= p.send_at) {
            return self.pending.take();
        }
        None
    }

    /// 是否处于 ARMED 状态
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// 当前待派发通知（只读）
    pub fn pending(&self) -> Option<&PendingNotification> {
        self.pending.as_ref()
    }

    /// 最近一次武装的信号源 K 线时间
    pub fn last_signal_candle(&self) -> Option<DateTime<Utc>> {
        self.last_signal_candle
    }
}
