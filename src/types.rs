use serde::{Deserialize, Serialize};

/// Envelope every backend endpoint wraps its payload in.
///
/// `success` implies `data` is present; a failure carries a human-readable
/// `error` and sometimes an additional `message`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            message: None,
        }
    }

    /// Unwraps the envelope, enforcing the success-implies-data invariant.
    /// A success envelope with a missing payload is reported as a failure.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Request failed".to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub symbol: String,
    pub sentiment: f64,
    pub confidence: f64,
    pub earnings_date: String,
    pub analysis_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_phrases: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    pub last_update: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StockPrediction {
    pub symbol: String,
    pub prediction: String,
    pub prediction_value: f64,
    pub confidence: f64,
    /// Prediction horizon in days.
    pub timeframe: u32,
    pub target_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalData {
    pub date: String,
    pub price: f64,
    pub volume: i64,
    pub sentiment: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SentimentHistory {
    pub quarter: String,
    pub sentiment: f64,
    pub actual_return: f64,
    pub predicted_return: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Aggregate produced by the combined analysis; owned by the caller for
/// the lifetime of one request, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiment: SentimentAnalysis,
    pub stock: StockData,
    pub prediction: StockPrediction,
    pub historical_data: Vec<HistoricalData>,
    pub sentiment_history: Vec<SentimentHistory>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEvent {
    pub symbol: String,
    pub company: String,
    pub date: String,
    pub time: String,
    pub quarter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sentiment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_sentiment: Option<f64>,
    pub importance: Importance,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStyle {
    Value,
    Growth,
    Dividend,
    Mixed,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    pub earnings_reminders: bool,
    pub sentiment_alerts: bool,
    pub portfolio_updates: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_portfolio: Option<String>,
    pub notifications: NotificationPrefs,
    pub risk_tolerance: RiskTolerance,
    pub investment_style: InvestmentStyle,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub preferences: UserPreferences,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub symbol: String,
    pub company: String,
    pub shares: f64,
    pub avg_cost: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub total_return: f64,
    pub total_return_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sentiment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_earnings: Option<String>,
    pub sentiment_trend: SentimentTrend,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub total_value: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub holdings: Vec<PortfolioHolding>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HoldingInput {
    pub symbol: String,
    pub shares: f64,
    pub avg_cost: f64,
}

/// Request body for portfolio creation.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub name: String,
    pub holdings: Vec<HoldingInput>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SentimentRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PredictionRequest {
    pub symbol: String,
    pub sentiment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_unwraps_to_data() {
        let envelope: ApiResponse<StockData> = serde_json::from_str(
            r#"{
                "success": true,
                "data": {
                    "symbol": "AAPL",
                    "price": 185.2,
                    "change": 1.3,
                    "changePercent": 0.7,
                    "volume": 1200000,
                    "marketCap": 2900000000000.0,
                    "lastUpdate": "2025-01-15T16:00:00Z"
                }
            }"#,
        )
        .unwrap();

        let data = envelope.into_result().unwrap();
        assert_eq!(data.symbol, "AAPL");
        assert_eq!(data.change_percent, 0.7);
    }

    #[test]
    fn failure_envelope_unwraps_to_error_message() {
        let envelope: ApiResponse<StockData> =
            serde_json::from_str(r#"{"success": false, "error": "symbol not found"}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap_err(), "symbol not found");
    }

    #[test]
    fn success_without_data_is_treated_as_failure() {
        let envelope: ApiResponse<StockData> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap_err(), "Request failed");
    }

    #[test]
    fn failure_falls_back_to_message_field() {
        let envelope: ApiResponse<StockData> =
            serde_json::from_str(r#"{"success": false, "message": "maintenance window"}"#)
                .unwrap();
        assert_eq!(envelope.into_result().unwrap_err(), "maintenance window");
    }

    #[test]
    fn earnings_event_importance_uses_lowercase_wire_values() {
        let event: EarningsEvent = serde_json::from_str(
            r#"{
                "symbol": "MSFT",
                "company": "Microsoft Corporation",
                "date": "2025-01-28",
                "time": "AMC",
                "quarter": "Q2 2025",
                "importance": "high"
            }"#,
        )
        .unwrap();
        assert_eq!(event.importance, Importance::High);
    }
}
