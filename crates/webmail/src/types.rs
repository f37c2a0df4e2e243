use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A local mail account as reported by the webmail backend. An empty
/// `gmail_address` means the account is not linked to Gmail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub local_name: String,
    pub gmail_address: String,
}

impl Account {
    pub fn is_authorized(&self) -> bool {
        !self.gmail_address.is_empty()
    }

    pub fn display_name(&self) -> String {
        if self.is_authorized() {
            format!("● {}", self.local_name)
        } else {
            format!("○ {}", self.local_name)
        }
    }
}

/// The backend's account list wire form: localName -> gmailAddress.
/// BTreeMap keeps the selection list in a stable order.
pub fn accounts_from_directory(directory: BTreeMap<String, String>) -> Vec<Account> {
    directory
        .into_iter()
        .map(|(local_name, gmail_address)| Account {
            local_name,
            gmail_address,
        })
        .collect()
}

/// What the user currently has selected, recomputed on every cursor move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub local_name: String,
    pub gmail_address: String,
    pub is_authorized: bool,
}

impl SelectionState {
    pub fn of(account: &Account) -> Self {
        Self {
            local_name: account.local_name.clone(),
            gmail_address: account.gmail_address.clone(),
            is_authorized: account.is_authorized(),
        }
    }
}

/// Backend verdict for authenticate, deauthenticate and authorize calls.
/// The wire keys are capitalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "URI", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl AuthResult {
    /// The consent page the browser must visit next, if the backend asked
    /// for one. Only a successful authenticate result carries it; revoke
    /// and exchange verdicts are terminal regardless of fields.
    pub fn consent_redirect(&self) -> Option<&str> {
        if self.success {
            self.uri.as_deref().filter(|u| !u.is_empty())
        } else {
            None
        }
    }
}
