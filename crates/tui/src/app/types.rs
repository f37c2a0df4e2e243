use capsule_link_webmail::callback::CallbackResult;
use capsule_link_webmail::types::AuthResult;

pub enum AppAsyncEvent {
    AccountsLoaded {
        accounts: Vec<capsule_link_webmail::types::Account>,
        error: Option<String>,
    },
    AuthenticationFinished {
        result: Option<AuthResult>,
        error: Option<String>,
    },
    RevocationFinished {
        result: Option<AuthResult>,
        error: Option<String>,
    },
    ExchangeFinished {
        result: Option<AuthResult>,
        error: Option<String>,
    },
}

/// What the Resolved screen shows: a verdict flag plus the full body,
/// rendered as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub body: serde_json::Value,
    pub resolved_at: chrono::DateTime<chrono::Utc>,
}

impl Outcome {
    pub fn from_result(result: &AuthResult) -> Self {
        Self {
            success: result.success,
            body: serde_json::to_value(result).unwrap_or(serde_json::Value::Null),
            resolved_at: chrono::Utc::now(),
        }
    }

    pub fn from_callback(callback: &CallbackResult) -> Self {
        Self {
            success: callback.indicates_success(),
            body: serde_json::to_value(callback).unwrap_or(serde_json::Value::Null),
            resolved_at: chrono::Utc::now(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            body: serde_json::json!({ "Success": false, "Message": message }),
            resolved_at: chrono::Utc::now(),
        }
    }

    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_outcomes_carry_the_wire_keys() {
        let outcome = Outcome::from_result(&AuthResult {
            success: true,
            message: "linked".to_string(),
            uri: None,
        });

        assert!(outcome.success);
        let pretty = outcome.pretty_body();
        assert!(pretty.contains("\"Success\": true"));
        assert!(pretty.contains("\"Message\": \"linked\""));
    }

    #[test]
    fn failure_outcomes_render_like_verdicts() {
        let outcome = Outcome::failure("Request timed out. Please try again.");

        assert!(!outcome.success);
        assert!(outcome.pretty_body().contains("\"Success\": false"));
    }
}
