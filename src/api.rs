use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::cache::StockCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::token_store::TokenStore;
use crate::types::{
    AnalysisResult, ApiResponse, AuthSession, Credentials, EarningsEvent, HealthStatus,
    HistoricalData, NewPortfolio, Portfolio, PredictionRequest, SearchResult, SentimentAnalysis,
    SentimentHistory, SentimentRequest, StockData, StockPrediction, User,
};

// Seed universe served by the client-side search until the backend grows a
// /search endpoint.
const STOCK_UNIVERSE: &[(&str, &str, &str)] = &[
    ("AAPL", "Apple Inc.", "NASDAQ"),
    ("MSFT", "Microsoft Corporation", "NASDAQ"),
    ("GOOGL", "Alphabet Inc.", "NASDAQ"),
    ("TSLA", "Tesla, Inc.", "NASDAQ"),
    ("AMZN", "Amazon.com, Inc.", "NASDAQ"),
];

/// Single point of contact with the sentiment backend.
///
/// Owns the shared HTTP transport, attaches the stored bearer credential to
/// outgoing requests, unwraps the response envelope, and clears the
/// credential when the backend answers 401. Business failures come back as
/// failure envelopes, never as errors.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    cache: StockCache,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            cache: StockCache::new(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a request with the bearer credential attached when a token is
    /// stored; without one the request goes out unauthenticated.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(path));
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 401 invalidates the stored credential before anything else happens.
    fn handle_status(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend answered 401, clearing stored credential");
            self.tokens.clear();
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        self.handle_status(status);

        let body = response.text().await?;
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ApiError::Business(status.to_string())),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }

    fn failure<T>(context: &str, err: ApiError) -> ApiResponse<T> {
        error!("{} failed: {}", context, err);
        ApiResponse::error(err.to_string())
    }

    /// GET /health. The one operation without the envelope: the backend
    /// reports its status as a bare body, and transport failures propagate.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Business(status.to_string()));
        }
        Ok(response.json::<HealthStatus>().await?)
    }

    /// POST /sentiment.
    pub async fn analyze_sentiment(
        &self,
        request: &SentimentRequest,
    ) -> ApiResponse<SentimentAnalysis> {
        let builder = self.request(Method::POST, "/sentiment").json(request);
        match self.send(builder).await {
            Ok(envelope) => envelope,
            Err(e) => Self::failure("Sentiment analysis", e),
        }
    }

    /// GET /stock/:symbol, served from the quote cache when fresh.
    pub async fn get_stock_data(&self, symbol: &str) -> ApiResponse<StockData> {
        if let Some(cached) = self.cache.get_quote(symbol).await {
            debug!("Quote cache hit for {}", symbol);
            return ApiResponse::success(cached);
        }

        let builder = self.request(Method::GET, &format!("/stock/{}", symbol));
        let envelope = match self.send::<StockData>(builder).await {
            Ok(envelope) => envelope,
            Err(e) => return Self::failure("Stock data", e),
        };

        if envelope.success {
            if let Some(data) = &envelope.data {
                self.cache.set_quote(symbol.to_string(), data.clone()).await;
            }
        }
        envelope
    }

    /// POST /prediction.
    pub async fn get_prediction(
        &self,
        request: &PredictionRequest,
    ) -> ApiResponse<StockPrediction> {
        let builder = self.request(Method::POST, "/prediction").json(request);
        match self.send(builder).await {
            Ok(envelope) => envelope,
            Err(e) => Self::failure("Prediction", e),
        }
    }

    /// Combined analysis: sentiment and quote are fetched concurrently,
    /// then a prediction is requested from the obtained sentiment score.
    /// When the fan-out fails, the sentiment error masks the quote error.
    pub async fn analyze_stock(&self, symbol: &str) -> ApiResponse<AnalysisResult> {
        let request = SentimentRequest {
            symbol: symbol.to_string(),
            transcript: None,
        };

        let (sentiment_res, stock_res) = tokio::join!(
            self.analyze_sentiment(&request),
            self.get_stock_data(symbol),
        );

        if let Some(message) = joint_error(&sentiment_res, &stock_res) {
            return ApiResponse::error(message);
        }
        let (sentiment, stock) = match (sentiment_res.data, stock_res.data) {
            (Some(sentiment), Some(stock)) => (sentiment, stock),
            _ => return ApiResponse::error("Analysis failed"),
        };

        let prediction_res = self
            .get_prediction(&PredictionRequest {
                symbol: symbol.to_string(),
                sentiment: sentiment.sentiment,
                timeframe: None,
            })
            .await;
        if !prediction_res.success {
            return ApiResponse::error(
                prediction_res
                    .error
                    .unwrap_or_else(|| "Prediction failed".to_string()),
            );
        }
        let prediction = match prediction_res.data {
            Some(prediction) => prediction,
            None => return ApiResponse::error("Prediction failed"),
        };

        let historical_data = historical_series(sentiment.sentiment);
        let sentiment_history = sentiment_history_series();

        ApiResponse::success(AnalysisResult {
            sentiment,
            stock,
            prediction,
            historical_data,
            sentiment_history,
        })
    }

    /// Case-insensitive substring match on symbol or name over the seed
    /// universe.
    pub async fn search_stocks(&self, query: &str) -> ApiResponse<Vec<SearchResult>> {
        let needle = query.trim().to_lowercase();
        let results = STOCK_UNIVERSE
            .iter()
            .filter(|(symbol, name, _)| {
                symbol.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
            })
            .map(|&(symbol, name, exchange)| SearchResult {
                symbol: symbol.to_string(),
                name: name.to_string(),
                exchange: exchange.to_string(),
            })
            .collect();

        ApiResponse::success(results)
    }

    /// GET /calendar?start_date&end_date. Range inclusivity is the
    /// backend's contract; dates are passed through as supplied.
    pub async fn get_earnings_calendar(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResponse<Vec<EarningsEvent>> {
        let start = start_date.format("%Y-%m-%d").to_string();
        let end = end_date.format("%Y-%m-%d").to_string();

        if let Some(cached) = self.cache.get_calendar(&start, &end).await {
            debug!("Calendar cache hit for {}..{}", start, end);
            return ApiResponse::success(cached);
        }

        let builder = self
            .request(Method::GET, "/calendar")
            .query(&[("start_date", start.as_str()), ("end_date", end.as_str())]);
        let envelope = match self.send::<Vec<EarningsEvent>>(builder).await {
            Ok(envelope) => envelope,
            Err(e) => return Self::failure("Earnings calendar", e),
        };

        if envelope.success {
            if let Some(events) = &envelope.data {
                self.cache.set_calendar(&start, &end, events.clone()).await;
            }
        }
        envelope
    }

    /// GET /portfolios.
    pub async fn get_portfolios(&self) -> ApiResponse<Vec<Portfolio>> {
        match self.send(self.request(Method::GET, "/portfolios")).await {
            Ok(envelope) => envelope,
            Err(e) => Self::failure("Portfolios", e),
        }
    }

    /// POST /portfolios.
    pub async fn create_portfolio(&self, portfolio: &NewPortfolio) -> ApiResponse<Portfolio> {
        let builder = self.request(Method::POST, "/portfolios").json(portfolio);
        match self.send(builder).await {
            Ok(envelope) => envelope,
            Err(e) => Self::failure("Portfolio creation", e),
        }
    }

    /// POST /auth/login; a successful session's token becomes the stored
    /// credential before the envelope is returned.
    pub async fn login(&self, credentials: &Credentials) -> ApiResponse<AuthSession> {
        let builder = self.request(Method::POST, "/auth/login").json(credentials);
        let envelope = match self.send::<AuthSession>(builder).await {
            Ok(envelope) => envelope,
            Err(e) => return Self::failure("Login", e),
        };

        if envelope.success {
            if let Some(session) = &envelope.data {
                self.tokens.set(&session.token);
            }
        }
        envelope
    }

    /// Clears the stored credential unconditionally, then notifies the
    /// backend best-effort; a failed notification is logged and swallowed.
    pub async fn logout(&self) {
        self.tokens.clear();

        match self.request(Method::POST, "/auth/logout").send().await {
            Ok(response) if !response.status().is_success() => {
                warn!("Logout notification failed: {}", response.status());
            }
            Ok(_) => {}
            Err(e) => warn!("Logout notification failed: {}", e),
        }
    }

    /// GET /auth/me.
    pub async fn get_current_user(&self) -> ApiResponse<User> {
        match self.send(self.request(Method::GET, "/auth/me")).await {
            Ok(envelope) => envelope,
            Err(e) => Self::failure("Current user", e),
        }
    }
}

/// Failure message for the concurrent fan-out. The sentiment error wins
/// when both calls fail; a failure without a message falls back to the
/// other call's, then to a generic one.
fn joint_error<A, B>(sentiment: &ApiResponse<A>, stock: &ApiResponse<B>) -> Option<String> {
    if sentiment.success && stock.success {
        return None;
    }
    Some(
        sentiment
            .error
            .clone()
            .or_else(|| stock.error.clone())
            .unwrap_or_else(|| "Analysis failed".to_string()),
    )
}

// TODO: drop both series builders once the backend exposes
// /stock/:symbol/history and the combined analysis can fetch real data.
fn historical_series(latest_sentiment: f64) -> Vec<HistoricalData> {
    let points = [
        ("2024-01", 150.0, 1_000_000, 0.6),
        ("2024-04", 165.0, 1_200_000, 0.7),
        ("2024-07", 170.0, 1_100_000, 0.8),
        ("2024-10", 180.0, 1_300_000, 0.75),
        ("2025-01", 185.0, 1_250_000, latest_sentiment),
    ];

    points
        .iter()
        .map(|&(date, price, volume, sentiment)| HistoricalData {
            date: date.to_string(),
            price,
            volume,
            sentiment,
        })
        .collect()
}

fn sentiment_history_series() -> Vec<SentimentHistory> {
    let quarters = [
        ("Q1 2024", 0.6, 10.0, 8.5),
        ("Q2 2024", 0.7, 2.9, 4.2),
        ("Q3 2024", 0.8, 5.9, 6.1),
        ("Q4 2024", 0.75, 8.8, 9.2),
    ];

    quarters
        .iter()
        .map(
            |&(quarter, sentiment, actual_return, predicted_return)| SentimentHistory {
                quarter: quarter.to_string(),
                sentiment,
                actual_return,
                predicted_return,
                accuracy: None,
            },
        )
        .collect()
}
