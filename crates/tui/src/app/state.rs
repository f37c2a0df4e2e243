use super::*;

/// Session phases. Busy phases have one network call in flight and ignore
/// action keys, so no two calls ever run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Selecting,
    Authenticating,
    AwaitingCallback,
    Deauthenticating,
    Exchanging,
    Resolved,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Phase::Loading | Phase::Authenticating | Phase::Deauthenticating | Phase::Exchanging
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Selecting => "selecting",
            Phase::Authenticating => "authenticating",
            Phase::AwaitingCallback => "awaiting callback",
            Phase::Deauthenticating => "deauthenticating",
            Phase::Exchanging => "exchanging",
            Phase::Resolved => "resolved",
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub phase: Phase,
    pub accounts: Vec<Account>,
    pub cursor: usize,
    pub accounts_scroll: usize,
    pub search_query: String,
    pub show_account_search: bool,
    pub consent_url: Option<String>,
    pub pending_navigation: Option<String>,
    pub exchange_state: Option<String>,
    pub outcome: Option<Outcome>,
    pub layout: LayoutState,
    pub input: InputState,
    pub keybinds: Keybinds,
    pub webmail_api: WebmailApi,
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
    pub scroll_offset: usize,
    pub show_help: bool,
    pub drag_target: Option<DragTarget>,
    pub last_mouse_pos: (u16, u16),
    pub busy_since: Option<Instant>,
    pub loading_message: String,
    pub last_error: Option<String>,
    pub show_error_details: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();
        let webmail_api = WebmailApi::new(&config.service.host);

        Self {
            should_quit: false,
            config,
            phase: Phase::Loading,
            accounts: Vec::new(),
            cursor: 0,
            accounts_scroll: 0,
            search_query: String::new(),
            show_account_search: false,
            consent_url: None,
            pending_navigation: None,
            exchange_state: None,
            outcome: None,
            layout: LayoutState::default(),
            input: InputState::new(),
            keybinds: Keybinds,
            webmail_api,
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
            scroll_offset: 0,
            show_help: false,
            drag_target: None,
            last_mouse_pos: (0, 0),
            busy_since: None,
            loading_message: "Loading accounts...".to_string(),
            last_error: None,
            show_error_details: false,
        }
    }

    pub fn visible_accounts(&self) -> Vec<&Account> {
        if self.search_query.is_empty() {
            self.accounts.iter().collect()
        } else {
            let query = self.search_query.to_lowercase();
            self.accounts
                .iter()
                .filter(|a| {
                    a.local_name.to_lowercase().contains(&query)
                        || a.gmail_address.to_lowercase().contains(&query)
                })
                .collect()
        }
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.visible_accounts().get(self.cursor).copied()
    }

    pub fn selection(&self) -> Option<SelectionState> {
        self.selected_account().map(SelectionState::of)
    }

    pub fn can_authenticate(&self) -> bool {
        self.phase == Phase::Selecting
            && self.selection().map(|s| !s.is_authorized).unwrap_or(false)
    }

    pub fn can_revoke(&self) -> bool {
        self.phase == Phase::Selecting
            && self.selection().map(|s| s.is_authorized).unwrap_or(false)
    }
}
