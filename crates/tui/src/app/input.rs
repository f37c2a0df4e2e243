use super::*;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Resize(_, _) => Ok(false),
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return Ok(false);
        }

        if self.show_error_details {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('E')
            ) {
                self.show_error_details = false;
            }
            return Ok(false);
        }

        if self.show_account_search {
            match key.code {
                KeyCode::Esc => {
                    self.show_account_search = false;
                    self.search_query.clear();
                    self.cursor = 0;
                }
                KeyCode::Enter => {
                    self.show_account_search = false;
                }
                KeyCode::Backspace => {
                    self.search_query.pop();
                    self.cursor = 0;
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    self.cursor = 0;
                }
                _ => {}
            }
            return Ok(false);
        }

        // The paste screen takes every printable key, including '?', which
        // redirect URLs contain.
        if self.phase == Phase::AwaitingCallback {
            match key.code {
                KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.pending_navigation = self.consent_url.clone();
                }
                KeyCode::Enter => self.submit_callback_url(),
                KeyCode::Esc => self.cancel_awaiting_callback(),
                KeyCode::Char(c) => self.input.handle_char(c),
                KeyCode::Backspace => self.input.handle_backspace(),
                _ => {}
            }
            return Ok(false);
        }

        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return Ok(false);
        }

        // Busy phases swallow action keys: one call in flight at a time.
        if self.phase.is_busy() {
            return Ok(false);
        }

        match self.phase {
            Phase::Selecting => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.move_cursor_up(),
                KeyCode::Down | KeyCode::Char('j') => self.move_cursor_down(),
                KeyCode::Enter | KeyCode::Char('a') => self.authenticate_selected(),
                KeyCode::Char('d') => self.revoke_selected(),
                KeyCode::Char('r') => self.reset_session(),
                KeyCode::Char('/') => {
                    self.show_account_search = true;
                    self.search_query.clear();
                    self.cursor = 0;
                }
                KeyCode::Char('E') => {
                    if self.last_error.is_some() {
                        self.show_error_details = true;
                    }
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            Phase::Resolved => match key.code {
                KeyCode::Char('r') => self.reset_session(),
                KeyCode::Up => {
                    if self.scroll_offset > 0 {
                        self.scroll_offset -= 1;
                    }
                }
                KeyCode::Down => self.scroll_offset += 1,
                KeyCode::Char('E') => {
                    if self.last_error.is_some() {
                        self.show_error_details = true;
                    }
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            _ => {}
        }

        Ok(false)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<bool> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last_mouse_pos = (mouse.column, mouse.row);

                if let Some(target) = self.hit_test(mouse.column, mouse.row) {
                    match target {
                        HitTarget::Account(idx) => {
                            if self.phase == Phase::Selecting {
                                self.select_account(idx);
                            }
                        }
                        HitTarget::AccountsDivider => {
                            self.drag_target = Some(DragTarget::Accounts);
                        }
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(target) = self.drag_target {
                    let delta = mouse.column as i16 - self.last_mouse_pos.0 as i16;
                    self.layout.handle_drag(target, delta);
                    self.last_mouse_pos = (mouse.column, mouse.row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_target = None;
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset += 1;
            }
            MouseEventKind::ScrollUp => {
                if self.scroll_offset > 0 {
                    self.scroll_offset -= 1;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn hit_test(&self, col: u16, row: u16) -> Option<HitTarget> {
        if let Some(accounts_rect) = self.layout.get_accounts_rect() {
            if row >= accounts_rect.y && row < accounts_rect.y + accounts_rect.height {
                let divider = accounts_rect.x + accounts_rect.width;
                if col == divider {
                    return Some(HitTarget::AccountsDivider);
                }
            }
        }

        let panels = self.layout.get_panels();
        for panel in panels {
            if Self::rect_contains(panel.rect, col, row) {
                return match panel.panel_type {
                    PanelType::Accounts => self.hit_accounts(panel.rect, col, row),
                    _ => None,
                };
            }
        }

        None
    }

    fn hit_accounts(&self, rect: Rect, _col: u16, row: u16) -> Option<HitTarget> {
        // Rows start below the top border; the list may be scrolled.
        let relative_row = row.checked_sub(rect.y + 1)? as usize;
        let idx = relative_row + self.accounts_scroll;
        if idx < self.visible_accounts().len() {
            return Some(HitTarget::Account(idx));
        }
        None
    }

    fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
        col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
    }
}

#[derive(Debug, Clone, Copy)]
enum HitTarget {
    Account(usize),
    AccountsDivider,
}
