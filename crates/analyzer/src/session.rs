use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use sinaleiro_core::common::Asset;
use sinaleiro_core::signal::entity::AnalyzerMode;

/// # Summary
/// 单条交易时段规则：星期与小时范围命中时激活某资产与分析模式。
///
/// # Invariants
/// - `weekdays` 为闭区间，0 = 周一。
/// - `hours` 为半开区间 `[start, end)`：起始小时激活，结束小时不激活。
#[derive(Debug, Clone)]
pub struct SessionRule {
    // 星期范围（闭区间，0=周一）
    pub weekdays: (u32, u32),
    // 小时范围（半开区间）
    pub hours: (u32, u32),
    // 该时段监控的资产
    pub asset: Asset,
    // 该时段使用的分析模式
    pub mode: AnalyzerMode,
}

impl SessionRule {
    /// 判断给定的星期与小时是否落在本规则范围内
    fn matches(&self, weekday: u32, hour: u32) -> bool {
        self.weekdays.0 <= weekday
            && weekday <= self.weekdays.1
            && self.hours.0 <= hour
            && hour < self.hours.1
    }
}

/// # Summary
/// 交易时段表。按声明顺序匹配，第一条命中即生效；
/// 全部未命中表示当前无交易时段，轮询循环应空转等待。
#[derive(Debug, Clone)]
pub struct Schedule {
    rules: Vec<SessionRule>,
}

impl Schedule {
    /// 使用给定规则表构造
    pub fn new(rules: Vec<SessionRule>) -> Self {
        Self { rules }
    }

    /// # Summary
    /// 默认时段表（沿用原始部署的两个时段）。
    ///
    /// # Logic
    /// 1. 工作日 09h–18h：EURUSD，价格行为合流模式。
    /// 2. 每天 14h–23h：EURUSD-OTC，趋势确认模式。
    pub fn default_rules() -> Self {
        Self::new(vec![
            SessionRule {
                weekdays: (0, 4),
                hours: (9, 18),
                asset: Asset::new("EURUSD"),
                mode: AnalyzerMode::PriceActionConfluence,
            },
            SessionRule {
                weekdays: (0, 6),
                hours: (14, 23),
                asset: Asset::new("EURUSD-OTC"),
                mode: AnalyzerMode::TrendConfirmation,
            },
        ])
    }

    /// # Summary
    /// 根据本地挂钟时间选择当前交易时段。
    ///
    /// # Arguments
    /// * `now`: 已换算到部署时区的当前时间。
    ///
    /// # Returns
    /// 命中返回第一条匹配规则，无时段返回 None。
    pub fn select(&self, now: DateTime<FixedOffset>) -> Option<&SessionRule> {
        let weekday = now.weekday().num_days_from_monday();
        let hour = now.hour();
        self.rules.iter().find(|rule| rule.matches(weekday, hour))
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::default_rules()
    }
}
