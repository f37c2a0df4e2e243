use super::*;

impl App {
    /// Loads the account directory, then interprets the startup callback
    /// URL if one was handed over. The listing is awaited here so the first
    /// frame after init already shows the selection screen; a listing
    /// failure renders exactly like an empty directory.
    pub async fn init(&mut self, _config: &Config, startup_callback: Option<&str>) -> Result<()> {
        match self.webmail_api.list_accounts().await {
            Ok(accounts) => {
                self.accounts = accounts;
                tracing::info!(count = self.accounts.len(), "Account directory loaded");
            }
            Err(e) => {
                self.report_error("Failed to load accounts", App::actionable_error(&e));
                self.accounts = Vec::new();
            }
        }

        self.cursor = 0;
        self.phase = Phase::Selecting;

        if let Some(url) = startup_callback {
            self.handle_callback_url(url);
        }

        Ok(())
    }

    /// Routes an interpreted redirect: a pending callback starts the
    /// backend exchange, anything else is the final result to show. Called
    /// for the startup URL and for pasted ones alike.
    pub(super) fn handle_callback_url(&mut self, raw_url: &str) {
        match callback::interpret(raw_url) {
            Ok(Some(result)) => match result.disposition() {
                Disposition::Exchange { state } => {
                    if self.phase == Phase::Exchanging {
                        tracing::debug!("Ignoring a pending callback while an exchange is in flight");
                        return;
                    }
                    self.begin_exchange(state);
                }
                Disposition::Terminal => {
                    self.resolve(Outcome::from_callback(&result));
                }
            },
            Ok(None) => {
                tracing::debug!("Callback URL carried no parameters");
            }
            Err(e) => {
                self.report_error("Could not interpret the callback URL", e);
            }
        }
    }

    pub(super) fn begin_exchange(&mut self, state: String) {
        self.phase = Phase::Exchanging;
        self.busy_since = Some(Instant::now());
        self.exchange_state = Some(state.clone());

        let api = self.webmail_api.clone();
        self.spawn_app_task(async move {
            match api.exchange_authorization(&state).await {
                Ok(result) => AppAsyncEvent::ExchangeFinished {
                    result: Some(result),
                    error: None,
                },
                Err(e) => AppAsyncEvent::ExchangeFinished {
                    result: None,
                    error: Some(App::actionable_error(&e)),
                },
            }
        });
    }

    pub(super) fn resolve(&mut self, outcome: Outcome) {
        self.phase = Phase::Resolved;
        self.busy_since = None;
        self.exchange_state = None;
        self.scroll_offset = 0;
        self.outcome = Some(outcome);
    }

    /// Drains completion events from spawned network calls and applies
    /// their phase transitions. Runs once per loop tick on the UI thread,
    /// so all state changes stay single threaded.
    pub fn process_app_events(&mut self) {
        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            match event {
                AppAsyncEvent::AccountsLoaded { accounts, error } => {
                    if let Some(err) = error {
                        self.report_error("Failed to load accounts", err);
                        self.accounts = Vec::new();
                    } else {
                        self.accounts = accounts;
                        self.clear_error();
                    }
                    self.cursor = 0;
                    self.busy_since = None;
                    self.phase = Phase::Selecting;
                }
                AppAsyncEvent::AuthenticationFinished { result, error } => {
                    self.busy_since = None;
                    if let Some(err) = error {
                        self.report_error("Authentication failed", err.clone());
                        self.resolve(Outcome::failure(&err));
                    } else if let Some(result) = result {
                        if let Some(uri) = result.consent_redirect() {
                            self.consent_url = Some(uri.to_string());
                            self.pending_navigation = Some(uri.to_string());
                            self.input.clear();
                            self.phase = Phase::AwaitingCallback;
                        } else {
                            self.resolve(Outcome::from_result(&result));
                        }
                    }
                }
                AppAsyncEvent::RevocationFinished { result, error } => {
                    self.busy_since = None;
                    if let Some(err) = error {
                        self.report_error("Deauthentication failed", err.clone());
                        self.resolve(Outcome::failure(&err));
                    } else if let Some(result) = result {
                        self.resolve(Outcome::from_result(&result));
                    }
                }
                AppAsyncEvent::ExchangeFinished { result, error } => {
                    self.busy_since = None;
                    if let Some(err) = error {
                        self.report_error("Authorization exchange failed", err.clone());
                        self.resolve(Outcome::failure(&err));
                    } else if let Some(result) = result {
                        self.resolve(Outcome::from_result(&result));
                    }
                }
            }
        }
    }
}
