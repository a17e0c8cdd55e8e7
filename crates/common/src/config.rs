use serde::Deserialize;

/// Default Expo-compatible push batch endpoint.
pub const DEFAULT_PUSH_API_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Default Twilio-compatible SMS API base URL.
pub const DEFAULT_SMS_API_URL: &str = "https://api.twilio.com";

/// Global application configuration loaded from environment variables.
///
/// Provider credentials are handed to the gateway constructors explicitly;
/// nothing in the dispatch core reads ambient process state.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Push provider batch endpoint (default: Expo's public endpoint)
    pub push_api_url: String,

    /// Optional bearer token for the push provider
    pub push_access_token: Option<String>,

    /// SMS provider API base URL (default: Twilio)
    pub sms_api_url: String,

    /// SMS provider account identifier
    pub sms_account_sid: Option<String>,

    /// SMS provider auth token
    pub sms_auth_token: Option<String>,

    /// Sender phone number for outbound SMS
    pub sms_from_number: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            push_api_url: std::env::var("PUSH_API_URL")
                .unwrap_or_else(|_| DEFAULT_PUSH_API_URL.to_string()),
            push_access_token: std::env::var("PUSH_ACCESS_TOKEN").ok(),
            sms_api_url: std::env::var("SMS_API_URL")
                .unwrap_or_else(|_| DEFAULT_SMS_API_URL.to_string()),
            sms_account_sid: std::env::var("SMS_ACCOUNT_SID").ok(),
            sms_auth_token: std::env::var("SMS_AUTH_TOKEN").ok(),
            sms_from_number: std::env::var("SMS_FROM_NUMBER").ok(),
        })
    }
}
