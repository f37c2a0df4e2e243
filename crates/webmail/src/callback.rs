use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Value of the `authorization` parameter that marks a two-step flow:
/// the redirect is not the verdict, the backend exchange is.
pub const PENDING_AUTHORIZATION: &str = "pending";

const URL_KEY: &str = "url";
const AUTHORIZATION_KEY: &str = "authorization";
const STATE_KEY: &str = "state";
const SUCCESS_KEY: &str = "Success";

/// Everything the redirect URL carried: each query pair plus the full URL
/// under `url`. A query parameter literally named `url` takes precedence
/// over the synthesized entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackResult {
    #[serde(flatten)]
    params: BTreeMap<String, String>,
}

/// What the session should do with an interpreted callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// `authorization=pending`: ask the backend to finish the handshake,
    /// quoting the correlation state.
    Exchange { state: String },
    /// The callback itself is the final result to show.
    Terminal,
}

/// Interprets a redirect URL. Returns `Ok(None)` when the URL carries no
/// query parameters, meaning there is no callback at all. Pure: the same
/// URL always produces the same result.
pub fn interpret(raw_url: &str) -> Result<Option<CallbackResult>> {
    let parsed = Url::parse(raw_url).context("Not a valid callback URL")?;

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if pairs.is_empty() {
        return Ok(None);
    }

    let mut params = BTreeMap::new();
    params.insert(URL_KEY.to_string(), raw_url.to_string());
    for (key, value) in pairs {
        params.insert(key, value);
    }

    Ok(Some(CallbackResult { params }))
}

impl CallbackResult {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn authorization(&self) -> Option<&str> {
        self.get(AUTHORIZATION_KEY)
    }

    /// The correlation token to quote back on the exchange leg. The backend
    /// may omit it; the exchange is then attempted with an empty state.
    pub fn state(&self) -> &str {
        self.get(STATE_KEY).unwrap_or("")
    }

    pub fn disposition(&self) -> Disposition {
        if self.authorization() == Some(PENDING_AUTHORIZATION) {
            Disposition::Exchange {
                state: self.state().to_string(),
            }
        } else {
            Disposition::Terminal
        }
    }

    /// A terminal callback counts as successful only when the backend put
    /// `Success=true` in the redirect. Provider error redirects carry no
    /// such key and render as failures.
    pub fn indicates_success(&self) -> bool {
        self.get(SUCCESS_KEY) == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_query_is_not_a_callback() {
        assert_eq!(interpret("https://webmail.mailcapsule.io/oauth/").unwrap(), None);
        assert_eq!(interpret("https://webmail.mailcapsule.io/oauth/?").unwrap(), None);
    }

    #[test]
    fn pending_callback_requests_an_exchange() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?authorization=pending&state=S123")
            .unwrap()
            .expect("callback present");

        assert_eq!(
            result.disposition(),
            Disposition::Exchange {
                state: "S123".to_string()
            }
        );
    }

    #[test]
    fn pending_without_state_exchanges_empty_state() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?authorization=pending")
            .unwrap()
            .expect("callback present");

        assert_eq!(
            result.disposition(),
            Disposition::Exchange {
                state: String::new()
            }
        );
    }

    #[test]
    fn non_pending_callback_is_terminal() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?Success=true&Message=linked")
            .unwrap()
            .expect("callback present");

        assert_eq!(result.disposition(), Disposition::Terminal);
        assert!(result.indicates_success());
    }

    #[test]
    fn provider_error_redirect_is_a_terminal_failure() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?error=access_denied")
            .unwrap()
            .expect("callback present");

        assert_eq!(result.disposition(), Disposition::Terminal);
        assert!(!result.indicates_success());
        assert_eq!(result.get("error"), Some("access_denied"));
    }

    #[test]
    fn every_parameter_and_the_url_are_preserved() {
        let raw = "https://webmail.mailcapsule.io/oauth/?a=1&b=two&authorization=done";
        let result = interpret(raw).unwrap().expect("callback present");

        assert_eq!(result.get("a"), Some("1"));
        assert_eq!(result.get("b"), Some("two"));
        assert_eq!(result.get("authorization"), Some("done"));
        assert_eq!(result.get("url"), Some(raw));
    }

    #[test]
    fn query_values_are_percent_decoded() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?Message=not%20linked%3A%20denied")
            .unwrap()
            .expect("callback present");

        assert_eq!(result.get("Message"), Some("not linked: denied"));
    }

    #[test]
    fn later_duplicate_keys_win() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?state=first&state=second")
            .unwrap()
            .expect("callback present");

        assert_eq!(result.state(), "second");
    }

    #[test]
    fn url_parameter_shadows_the_full_url() {
        let result = interpret("https://webmail.mailcapsule.io/oauth/?url=elsewhere")
            .unwrap()
            .expect("callback present");

        assert_eq!(result.get("url"), Some("elsewhere"));
    }

    #[test]
    fn interpretation_is_idempotent() {
        let raw = "https://webmail.mailcapsule.io/oauth/?authorization=pending&state=S1&extra=x";
        let first = interpret(raw).unwrap();
        let second = interpret(raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(interpret("not a url at all").is_err());
    }
}
