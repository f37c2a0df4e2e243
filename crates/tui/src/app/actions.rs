use super::*;

impl App {
    pub(super) fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub(super) fn move_cursor_down(&mut self) {
        let count = self.visible_accounts().len();
        if count > 0 && self.cursor < count - 1 {
            self.cursor += 1;
        }
    }

    pub(super) fn select_account(&mut self, idx: usize) {
        if idx < self.visible_accounts().len() {
            self.cursor = idx;
        }
    }

    /// Asks the backend for a consent URI for the selected unlinked account.
    /// Only legal while selecting; the Authenticating phase then swallows
    /// further action keys until the verdict arrives.
    pub(super) fn authenticate_selected(&mut self) {
        if !self.can_authenticate() {
            return;
        }

        if let Some(account) = self.selected_account().cloned() {
            self.phase = Phase::Authenticating;
            self.busy_since = Some(Instant::now());

            let api = self.webmail_api.clone();
            self.spawn_app_task(async move {
                match api.start_authentication(&account).await {
                    Ok(result) => AppAsyncEvent::AuthenticationFinished {
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => AppAsyncEvent::AuthenticationFinished {
                        result: None,
                        error: Some(App::actionable_error(&e)),
                    },
                }
            });
        }
    }

    /// Revokes the selected account's Gmail link. Always terminal: the
    /// verdict resolves the session, never a browser redirect.
    pub(super) fn revoke_selected(&mut self) {
        if !self.can_revoke() {
            return;
        }

        if let Some(account) = self.selected_account().cloned() {
            self.phase = Phase::Deauthenticating;
            self.busy_since = Some(Instant::now());

            let api = self.webmail_api.clone();
            self.spawn_app_task(async move {
                match api.revoke_authentication(&account).await {
                    Ok(result) => AppAsyncEvent::RevocationFinished {
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => AppAsyncEvent::RevocationFinished {
                        result: None,
                        error: Some(App::actionable_error(&e)),
                    },
                }
            });
        }
    }

    /// Starts the session over: every piece of session state is discarded
    /// and the account list reloads.
    pub(super) fn reset_session(&mut self) {
        self.phase = Phase::Loading;
        self.accounts.clear();
        self.cursor = 0;
        self.accounts_scroll = 0;
        self.search_query.clear();
        self.show_account_search = false;
        self.consent_url = None;
        self.pending_navigation = None;
        self.exchange_state = None;
        self.outcome = None;
        self.scroll_offset = 0;
        self.busy_since = None;
        self.input.clear();
        self.clear_error();
        self.loading_message = "Loading accounts...".to_string();

        let api = self.webmail_api.clone();
        self.spawn_app_task(async move {
            match api.list_accounts().await {
                Ok(accounts) => AppAsyncEvent::AccountsLoaded {
                    accounts,
                    error: None,
                },
                Err(e) => AppAsyncEvent::AccountsLoaded {
                    accounts: Vec::new(),
                    error: Some(App::actionable_error(&e)),
                },
            }
        });
    }

    pub(super) fn submit_callback_url(&mut self) {
        let raw = self.input.buffer.trim().to_string();
        if raw.is_empty() {
            return;
        }

        self.input.clear();
        self.handle_callback_url(&raw);
    }

    pub(super) fn cancel_awaiting_callback(&mut self) {
        self.phase = Phase::Selecting;
        self.consent_url = None;
        self.pending_navigation = None;
        self.input.clear();
    }
}
