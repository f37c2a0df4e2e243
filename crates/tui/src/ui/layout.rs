use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::panel::{Panel, PanelType};

#[derive(Debug, Clone, Copy)]
pub enum DragTarget {
    Accounts,
}

const MIN_ACCOUNTS_WIDTH: u16 = 18;
const MAX_ACCOUNTS_WIDTH: u16 = 48;
const TOPBAR_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

pub struct LayoutState {
    accounts_width: u16,
    cached_panels: Vec<Panel>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            accounts_width: 28,
            cached_panels: Vec::new(),
        }
    }
}

impl LayoutState {
    pub fn calculate_layout(&mut self, area: Rect) -> &[Panel] {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TOPBAR_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        let content_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.accounts_width),
                Constraint::Min(40),
            ])
            .split(main_layout[1]);

        self.cached_panels = vec![
            Panel {
                panel_type: PanelType::Topbar,
                rect: main_layout[0],
            },
            Panel {
                panel_type: PanelType::Accounts,
                rect: content_layout[0],
            },
            Panel {
                panel_type: PanelType::Detail,
                rect: content_layout[1],
            },
            Panel {
                panel_type: PanelType::StatusBar,
                rect: main_layout[2],
            },
        ];

        &self.cached_panels
    }

    pub fn get_panels(&self) -> &[Panel] {
        &self.cached_panels
    }

    pub fn handle_drag(&mut self, target: DragTarget, delta: i16) {
        match target {
            DragTarget::Accounts => {
                let new_width = (self.accounts_width as i16 + delta)
                    .clamp(MIN_ACCOUNTS_WIDTH as i16, MAX_ACCOUNTS_WIDTH as i16)
                    as u16;
                self.accounts_width = new_width;
            }
        }
    }

    pub fn get_accounts_rect(&self) -> Option<Rect> {
        self.cached_panels
            .iter()
            .find(|p| matches!(p.panel_type, PanelType::Accounts))
            .map(|p| p.rect)
    }
}
