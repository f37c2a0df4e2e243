use crate::config::Config;
use crate::input::InputState;
use crate::keybinds::Keybinds;
use crate::ui::layout::{DragTarget, LayoutState};
use crate::ui::panel::PanelType;
use anyhow::Result;
use capsule_link_webmail::api::WebmailApi;
use capsule_link_webmail::callback::{self, Disposition};
use capsule_link_webmail::error::map_anyhow_error;
use capsule_link_webmail::types::{Account, SelectionState};
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc;

mod actions;
mod effects;
mod input;
mod render;
mod state;
mod types;

pub use state::{App, Phase};
pub use types::{AppAsyncEvent, Outcome};

impl App {
    pub(super) fn report_error(&mut self, context: &str, error: impl std::fmt::Display) {
        let message = format!("{context}: {error}");
        self.last_error = Some(message.clone());
        tracing::warn!("{message}");
    }

    pub(super) fn actionable_error(error: &anyhow::Error) -> String {
        map_anyhow_error(error).user_message().to_string()
    }

    pub(super) fn clear_error(&mut self) {
        self.last_error = None;
        self.show_error_details = false;
    }

    /// The URL the main loop should open in the system browser, if any.
    /// Consuming it here keeps browser side effects out of the state
    /// machine itself.
    pub fn take_pending_navigation(&mut self) -> Option<String> {
        self.pending_navigation.take()
    }

    pub(super) fn spawn_app_task<F>(&self, future: F)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = future.await;
                let _ = tx.send(event);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppAsyncEvent, Phase};
    use crate::config::Config;
    use capsule_link_webmail::types::{Account, AuthResult};

    fn sample_accounts() -> Vec<Account> {
        vec![
            Account {
                local_name: "gmail.alice".to_string(),
                gmail_address: "alice@gmail.com".to_string(),
            },
            Account {
                local_name: "gmail.bob".to_string(),
                gmail_address: String::new(),
            },
        ]
    }

    fn loaded_app() -> App {
        let mut app = App::new(Config::default());
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::AccountsLoaded {
            accounts: sample_accounts(),
            error: None,
        })
        .expect("send accounts");
        app.process_app_events();
        app
    }

    #[test]
    fn account_load_enters_selection() {
        let app = loaded_app();

        assert_eq!(app.phase, Phase::Selecting);
        assert_eq!(app.accounts.len(), 2);
    }

    #[test]
    fn load_failure_renders_like_an_empty_directory() {
        let mut app = App::new(Config::default());
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::AccountsLoaded {
            accounts: Vec::new(),
            error: Some("Network error. Check the webmail host and your connection.".to_string()),
        })
        .expect("send failure");

        app.process_app_events();

        assert_eq!(app.phase, Phase::Selecting);
        assert!(app.accounts.is_empty());
        assert!(app.last_error.is_some());
        assert!(!app.can_authenticate());
        assert!(!app.can_revoke());
    }

    #[test]
    fn empty_directory_disables_both_controls() {
        let mut app = App::new(Config::default());
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::AccountsLoaded {
            accounts: Vec::new(),
            error: None,
        })
        .expect("send empty directory");

        app.process_app_events();

        assert_eq!(app.selection(), None);
        assert!(!app.can_authenticate());
        assert!(!app.can_revoke());
    }

    #[test]
    fn exactly_one_control_is_offered_per_account() {
        let mut app = loaded_app();

        // gmail.alice is linked
        assert!(app.can_revoke());
        assert!(!app.can_authenticate());

        app.move_cursor_down();

        // gmail.bob is not
        assert!(app.can_authenticate());
        assert!(!app.can_revoke());
    }

    #[test]
    fn selection_tracks_the_link_status() {
        let app = loaded_app();
        let selection = app.selection().expect("selection");

        assert_eq!(selection.local_name, "gmail.alice");
        assert_eq!(selection.gmail_address, "alice@gmail.com");
        assert!(selection.is_authorized);
    }

    #[tokio::test]
    async fn pending_callback_enters_exchanging_with_the_state() {
        let mut app = loaded_app();

        app.handle_callback_url(
            "https://webmail.mailcapsule.io/oauth/?authorization=pending&state=S42",
        );

        assert_eq!(app.phase, Phase::Exchanging);
        assert_eq!(app.exchange_state.as_deref(), Some("S42"));
    }

    #[tokio::test]
    async fn a_second_pending_callback_is_ignored_while_exchanging() {
        let mut app = loaded_app();

        app.handle_callback_url(
            "https://webmail.mailcapsule.io/oauth/?authorization=pending&state=first",
        );
        app.handle_callback_url(
            "https://webmail.mailcapsule.io/oauth/?authorization=pending&state=second",
        );

        assert_eq!(app.phase, Phase::Exchanging);
        assert_eq!(app.exchange_state.as_deref(), Some("first"));
    }

    #[test]
    fn terminal_callback_resolves_without_exchange() {
        let mut app = loaded_app();

        app.handle_callback_url(
            "https://webmail.mailcapsule.io/oauth/?Success=true&Message=linked&state=S1",
        );

        assert_eq!(app.phase, Phase::Resolved);
        assert_eq!(app.exchange_state, None);
        assert!(app.outcome.as_ref().expect("outcome").success);
    }

    #[test]
    fn provider_error_callback_resolves_as_failure() {
        let mut app = loaded_app();

        app.handle_callback_url("https://webmail.mailcapsule.io/oauth/?error=access_denied");

        assert_eq!(app.phase, Phase::Resolved);
        assert!(!app.outcome.as_ref().expect("outcome").success);
    }

    #[test]
    fn callback_without_parameters_changes_nothing() {
        let mut app = loaded_app();

        app.handle_callback_url("https://webmail.mailcapsule.io/oauth/");

        assert_eq!(app.phase, Phase::Selecting);
        assert!(app.outcome.is_none());
    }

    #[test]
    fn consent_redirect_queues_navigation_and_waits() {
        let mut app = loaded_app();
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::AuthenticationFinished {
            result: Some(AuthResult {
                success: true,
                message: "consent required".to_string(),
                uri: Some("https://accounts.google.com/o/oauth2/auth?state=S1".to_string()),
            }),
            error: None,
        })
        .expect("send authentication");

        app.process_app_events();

        assert_eq!(app.phase, Phase::AwaitingCallback);
        assert_eq!(
            app.take_pending_navigation().as_deref(),
            Some("https://accounts.google.com/o/oauth2/auth?state=S1")
        );
    }

    #[test]
    fn failed_authentication_resolves_with_the_verdict() {
        let mut app = loaded_app();
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::AuthenticationFinished {
            result: Some(AuthResult {
                success: false,
                message: "account is busy".to_string(),
                uri: None,
            }),
            error: None,
        })
        .expect("send authentication");

        app.process_app_events();

        assert_eq!(app.phase, Phase::Resolved);
        assert!(!app.outcome.as_ref().expect("outcome").success);
        assert!(app.take_pending_navigation().is_none());
    }

    #[test]
    fn revocation_success_resolves_without_navigation() {
        let mut app = loaded_app();
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::RevocationFinished {
            result: Some(AuthResult {
                success: true,
                message: "revoked".to_string(),
                uri: None,
            }),
            error: None,
        })
        .expect("send revocation");

        app.process_app_events();

        assert_eq!(app.phase, Phase::Resolved);
        assert!(app.outcome.as_ref().expect("outcome").success);
        assert!(app.take_pending_navigation().is_none());
    }

    #[test]
    fn transport_failure_resolves_as_rendered_failure() {
        let mut app = loaded_app();
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::ExchangeFinished {
            result: None,
            error: Some("Request timed out. Please try again.".to_string()),
        })
        .expect("send exchange failure");

        app.process_app_events();

        assert_eq!(app.phase, Phase::Resolved);
        assert!(!app.outcome.as_ref().expect("outcome").success);
        assert!(app.last_error.is_some());
    }

    #[tokio::test]
    async fn reset_returns_to_loading_and_clears_the_outcome() {
        let mut app = loaded_app();
        let tx = app.app_async_tx.as_ref().expect("async tx").clone();
        tx.send(AppAsyncEvent::RevocationFinished {
            result: Some(AuthResult {
                success: true,
                message: "revoked".to_string(),
                uri: None,
            }),
            error: None,
        })
        .expect("send revocation");
        app.process_app_events();
        assert_eq!(app.phase, Phase::Resolved);

        app.reset_session();

        assert_eq!(app.phase, Phase::Loading);
        assert!(app.outcome.is_none());
        assert!(app.accounts.is_empty());
    }

    #[test]
    fn search_narrows_the_selection_list() {
        let mut app = loaded_app();

        app.search_query = "bob".to_string();

        assert_eq!(app.visible_accounts().len(), 1);
        assert_eq!(app.selection().expect("selection").local_name, "gmail.bob");
    }
}
