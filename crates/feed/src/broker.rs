use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use sinaleiro_core::common::{Asset, TimeFrame};
use sinaleiro_core::config::{BackoffConfig, BrokerConfig};
use sinaleiro_core::market::entity::RawCandle;
use sinaleiro_core::market::error::MarketError;
use sinaleiro_core::market::port::CandleSource;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// # Summary
/// 行情源 HTTP 会话客户端。持有登录会话并按需抓取原始 K 线窗口。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，请求超时 10 秒。
/// - 会话令牌在 `connect` 成功前为空，此时 `fetch_candles` 拒绝服务。
pub struct BrokerClient {
    /// 内部使用的 HTTP 客户端
    client: reqwest::Client,
    /// 连接配置（接入点与凭证）
    config: BrokerConfig,
    /// 当前会话令牌，未连接时为 None
    session: RwLock<Option<String>>,
}

impl BrokerClient {
    /// # Summary
    /// 创建一个新的 BrokerClient 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端，会话令牌置空。
    ///
    /// # Arguments
    /// * `config`: 行情源连接配置。
    ///
    /// # Returns
    /// 返回初始化后的 BrokerClient。
    pub fn new(config: BrokerConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".parse().unwrap()
        );

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .default_headers(headers)
                .build()
                .expect("Failed to build HTTP client"),
            config,
            session: RwLock::new(None),
        }
    }

    /// # Summary
    /// 执行一次登录尝试。
    ///
    /// # Logic
    /// 1. POST 凭证到登录接口。
    /// 2. 校验 HTTP 状态码并解析会话令牌。
    ///
    /// # Returns
    /// 成功返回会话令牌，失败返回 MarketError。
    async fn try_login(&self) -> Result<String, MarketError> {
        let url = format!("{}/api/login", self.config.base_url);
        let payload = LoginRequest {
            email: &self.config.email,
            password: &self.config.password,
        };

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Connect(format!("HTTP {}", resp.status())));
        }

        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        Ok(body.ssid)
    }
}

/// 登录请求载荷
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// # Summary
/// 登录接口响应。
#[derive(Deserialize, Debug)]
struct LoginResponse {
    // 会话令牌，后续请求以 Bearer 方式携带
    ssid: String,
}

/// # Summary
/// K 线接口响应。
///
/// # Invariants
/// - `candles` 与 `error` 互斥出现。
#[derive(Deserialize, Debug)]
struct CandlesResponse {
    candles: Option<Vec<serde_json::Value>>,
    error: Option<String>,
}

/// 按指数退避策略计算第 `attempt` 次失败后的等待时长（含随机抖动）
fn backoff_delay(policy: &BackoffConfig, attempt: u32) -> Duration {
    let factor = u64::from(policy.multiplier).saturating_pow(attempt);
    let base = policy
        .base_delay_secs
        .saturating_mul(factor)
        .min(policy.max_delay_secs);
    let jitter_ms = rand::rng().random_range(0..=policy.jitter_secs.saturating_mul(1000));
    Duration::from_secs(base) + Duration::from_millis(jitter_ms)
}

#[async_trait]
impl CandleSource for BrokerClient {
    /// # Summary
    /// 建立与行情源的会话，失败时按指数退避重试。
    ///
    /// # Logic
    /// 1. 依次发起登录尝试，成功则保存会话令牌并返回。
    /// 2. 每次失败后等待 `base * multiplier^attempt`（封顶）加随机抖动，
    ///    抖动用于避免成群重连压垮接入点。
    /// 3. 尝试次数耗尽返回 `MarketError::Exhausted`。
    async fn connect(&self) -> Result<(), MarketError> {
        let policy = self.config.backoff.clone();

        for attempt in 0..policy.max_attempts {
            info!(attempt = attempt + 1, "Connecting to broker");
            match self.try_login().await {
                Ok(ssid) => {
                    *self.session.write().await = Some(ssid);
                    info!("Broker session established");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "Broker login failed");
                }
            }

            if attempt + 1 < policy.max_attempts {
                let delay = backoff_delay(&policy, attempt);
                info!(delay_ms = delay.as_millis(), "Backing off before retry");
                tokio::time::sleep(delay).await;
            }
        }

        Err(MarketError::Exhausted(policy.max_attempts))
    }

    /// # Summary
    /// 抓取指定资产截至 `as_of` 的最近 `count` 根原始 K 线。
    ///
    /// # Logic
    /// 1. 校验会话令牌存在。
    /// 2. 构建包含 asset, interval, count, to 的查询请求。
    /// 3. 解析响应并原样返回松散类型记录，字段别名交由规范化边界处理。
    /// 4. 空列表视为数据不可用。
    async fn fetch_candles(
        &self,
        asset: &Asset,
        timeframe: TimeFrame,
        count: usize,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError> {
        let ssid = self
            .session
            .read()
            .await
            .clone()
            .ok_or_else(|| MarketError::Connect("not connected to broker".into()))?;

        let url = format!("{}/api/candles", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(ssid)
            .query(&[
                ("asset", asset.symbol.as_str()),
                ("interval", &timeframe.as_secs().to_string()),
                ("count", &count.to_string()),
                ("to", &as_of.timestamp().to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let body: CandlesResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(MarketError::NoData(format!("{}: {}", asset.symbol, err)));
        }

        let values = body
            .candles
            .ok_or_else(|| MarketError::NoData(asset.symbol.clone()))?;
        if values.is_empty() {
            return Err(MarketError::NoData(asset.symbol.clone()));
        }

        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match value {
                serde_json::Value::Object(map) => records.push(map),
                other => {
                    return Err(MarketError::Parse(format!(
                        "candle record is not an object: {other}"
                    )));
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_growth_and_cap() {
        let policy = BackoffConfig {
            base_delay_secs: 5,
            multiplier: 2,
            max_delay_secs: 300,
            jitter_secs: 0,
            max_attempts: 8,
        };

        assert_eq!(backoff_delay(&policy, 0), Duration::from_secs(5));
        assert_eq!(backoff_delay(&policy, 1), Duration::from_secs(10));
        assert_eq!(backoff_delay(&policy, 2), Duration::from_secs(20));
        // 5 * 2^7 = 640 超过上限，封顶为 300
        assert_eq!(backoff_delay(&policy, 7), Duration::from_secs(300));
    }

    #[test]
    fn test_backoff_jitter_bounded() {
        let policy = BackoffConfig {
            base_delay_secs: 5,
            multiplier: 2,
            max_delay_secs: 300,
            jitter_secs: 3,
            max_attempts: 8,
        };

        for _ in 0..50 {
            let delay = backoff_delay(&policy, 0);
            assert!(delay >= Duration::from_secs(5));
            assert!(delay <= Duration::from_secs(8));
        }
    }

    #[tokio::test]
    async fn test_fetch_without_session_is_rejected() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = BrokerClient::new(BrokerConfig::default());
        let result = client
            .fetch_candles(
                &Asset::new("EURUSD"),
                TimeFrame::Minute5,
                30,
                chrono::Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(MarketError::Connect(_))));
    }
}
