use super::*;

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if self.phase == Phase::Loading {
            self.render_loading(frame, area);
            return;
        }

        if self.show_help {
            self.render_help(frame, area);
            return;
        }

        self.layout.calculate_layout(area);

        let panels = self.layout.get_panels().to_vec();

        for panel in panels {
            match panel.panel_type {
                PanelType::Topbar => self.render_topbar(frame, panel.rect),
                PanelType::Accounts => self.render_accounts(frame, panel.rect),
                PanelType::Detail => self.render_detail(frame, panel.rect),
                PanelType::StatusBar => self.render_status_bar(frame, panel.rect),
            }
        }

        if self.show_account_search {
            self.render_account_search(frame, area);
        }

        if self.show_error_details {
            self.render_error_details(frame, area);
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Paragraph};
        let text = format!("\n\n  {}  \n\n", self.loading_message);
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(" capsule-link "))
            .centered();
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Clear, Paragraph};
        let help_text = self.keybinds.help_text();
        let popup_area = self.centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press ? to close "),
            ),
            popup_area,
        );
    }

    fn render_topbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Paragraph};

        let text = format!(
            " ● Gmail Authorization v{}   {}   [{}]{}   [?] help",
            env!("CARGO_PKG_VERSION"),
            self.config.service.host,
            self.phase.label(),
            if self.last_error.is_some() {
                "   ⚠ error"
            } else {
                ""
            },
        );

        frame.render_widget(Paragraph::new(text).block(Block::default()), area);
    }

    fn render_accounts(&mut self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Modifier, Style};
        use ratatui::widgets::{Block, Borders, List, ListItem};

        // Visible rows inside the border.
        let visible_rows = area.height.saturating_sub(2) as usize;

        let filtered: Vec<Account> = self.visible_accounts().into_iter().cloned().collect();

        // Clamp the cursor when the filter shrinks the list.
        if self.cursor >= filtered.len() && !filtered.is_empty() {
            self.cursor = filtered.len() - 1;
        } else if filtered.is_empty() {
            self.cursor = 0;
        }

        // Keep the cursor visible by adjusting accounts_scroll.
        if visible_rows > 0 {
            if self.cursor < self.accounts_scroll {
                self.accounts_scroll = self.cursor;
            } else if self.cursor >= self.accounts_scroll + visible_rows {
                self.accounts_scroll = self.cursor + 1 - visible_rows;
            }
        }

        let mut items: Vec<ListItem> = vec![];

        if filtered.is_empty() {
            items.push(ListItem::new("  No eligible usernames exist"));
        }

        let end = (self.accounts_scroll + visible_rows).min(filtered.len());
        for i in self.accounts_scroll..end {
            let account = &filtered[i];
            let is_cursor = i == self.cursor;

            let prefix = if is_cursor { "> " } else { "  " };

            let style = if is_cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if account.is_authorized() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            items.push(ListItem::new(format!("{}{}", prefix, account.display_name())).style(style));
        }

        let title = if self.search_query.is_empty() {
            " Accounts ".to_string()
        } else {
            format!(" Accounts [{}] ", self.search_query)
        };

        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        match self.phase {
            Phase::Selecting => self.render_selection_detail(frame, area),
            Phase::AwaitingCallback => self.render_awaiting_callback(frame, area),
            Phase::Resolved => self.render_outcome(frame, area),
            _ => self.render_busy(frame, area),
        }
    }

    fn render_selection_detail(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Paragraph};

        let text = if self.accounts.is_empty() {
            "\n\n  No eligible usernames exist.\n\n  The webmail backend reported no local accounts.\n\n  Press [r] to reload\n".to_string()
        } else if let Some(selection) = self.selection() {
            let gmail = if selection.gmail_address.is_empty() {
                "(not linked)".to_string()
            } else {
                selection.gmail_address.clone()
            };
            let status = if selection.is_authorized {
                "authorized"
            } else {
                "not authorized"
            };
            let control = if selection.is_authorized {
                "[d] revoke the Gmail authorization"
            } else {
                "[a] request Gmail authorization"
            };
            format!(
                "\n\n  Local account:   {}\n  Gmail address:   {}\n  Status:          {}\n\n  {}\n",
                selection.local_name, gmail, status, control
            )
        } else {
            "\n\n  No account matches the filter.\n\n  Press [/] then [Esc] to clear it\n".to_string()
        };

        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Select a local account "),
            ),
            area,
        );
    }

    fn render_busy(&self, frame: &mut Frame, area: Rect) {
        use ratatui::layout::Alignment;
        use ratatui::widgets::{Block, Borders, Paragraph};

        let verb = match self.phase {
            Phase::Authenticating => "Requesting Google consent",
            Phase::Deauthenticating => "Revoking the authorization",
            Phase::Exchanging => "Completing the authorization exchange",
            _ => "Working",
        };

        let elapsed = self.busy_since.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        let mut text = format!("\n\n  {}... ({}s)\n", verb, elapsed);
        if self.phase == Phase::Exchanging {
            if let Some(ref state) = self.exchange_state {
                text.push_str(&format!("\n  state: {}\n", state));
            }
        }

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title(" Working "))
                .alignment(Alignment::Center),
            area,
        );
    }

    fn render_awaiting_callback(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Paragraph};

        let consent = self.consent_url.as_deref().unwrap_or("(no consent URL)");

        let url_line = {
            let cursor = self.input.cursor().min(self.input.buffer.len());
            let (before, after) = self.input.buffer.split_at(cursor);
            format!("{}█{}", before, after)
        };

        let text = format!(
            "\n\n  Google consent:\n\n  1. Finish the consent screen in your browser:\n     {}\n\n  2. Copy the full redirect URL from the address bar\n\n  3. Paste it below:\n\n  URL: {}\n\n  Press [Enter] to interpret the URL,\n  [Ctrl+O] to reopen the browser,\n  [Esc] to go back\n",
            consent, url_line
        );

        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Awaiting Callback "),
            ),
            area,
        );
    }

    fn render_outcome(&self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Style};
        use ratatui::widgets::{Block, Borders, Paragraph};

        let (text, border_style) = match self.outcome {
            Some(ref outcome) => {
                let banner = if outcome.success {
                    "Authorization succeeded"
                } else {
                    "Authorization failed"
                };
                let style = if outcome.success {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                };
                let revoke_instructions = if outcome.success {
                    "  The link can be revoked at any time: start over with [r],\n  select the account and press [d].\n\n"
                } else {
                    ""
                };
                (
                    format!(
                        "\n  {} at {}\n\n{}\n\n{}  [r] start over   [↑/↓] scroll\n",
                        banner,
                        outcome.resolved_at.format("%H:%M:%S"),
                        outcome.pretty_body(),
                        revoke_instructions
                    ),
                    style,
                )
            }
            None => (
                "\n  No outcome recorded.\n\n  [r] start over\n".to_string(),
                Style::default(),
            ),
        };

        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Outcome ")
                        .border_style(border_style),
                )
                .scroll((self.scroll_offset as u16, 0)),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Style};
        use ratatui::widgets::{Block, Paragraph};

        let (text, style) = if let Some(ref err) = self.last_error {
            (
                format!(" ⚠ {}   [E] details", err),
                Style::default().fg(Color::Red),
            )
        } else {
            let hint = match self.phase {
                Phase::Selecting => {
                    " [↑/↓] move   [Enter/a] authorize   [d] revoke   [/] filter   [r] reload   [q] quit"
                }
                Phase::AwaitingCallback => " Paste the redirect URL and press [Enter]   [Esc] back",
                Phase::Resolved => " [↑/↓] scroll   [r] start over   [q] quit",
                _ => " Working...",
            };
            (hint.to_string(), Style::default())
        };

        frame.render_widget(
            Paragraph::new(text).style(style).block(Block::default()),
            area,
        );
    }

    fn render_account_search(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Clear, Paragraph};

        let popup_area = self.centered_rect(50, 10, area);
        let matches = self.visible_accounts().len();

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(format!(
                "Filter: {}█   ({} matching)",
                self.search_query, matches
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Account Filter "),
            ),
            popup_area,
        );
    }

    fn render_error_details(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

        let popup_area = self.centered_rect(60, 20, area);
        let details = self
            .last_error
            .as_deref()
            .unwrap_or("No error details available.");
        let text = format!("{}\n\n[Esc] or [Enter] to close", details);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error Details "),
            ),
            popup_area,
        );
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
                ratatui::layout::Constraint::Percentage(percent_y),
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
                ratatui::layout::Constraint::Percentage(percent_x),
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
