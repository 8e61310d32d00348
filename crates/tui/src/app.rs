use std::{io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use estoque_core::{AppConfig, Inventory, Item, ItemDraft, Route};

const TICK_RATE: Duration = Duration::from_millis(250);
// Status messages stay visible for roughly three seconds.
const STATUS_TICKS: u8 = 12;
const MAX_FIELD_LEN: usize = 64;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Registration,
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Name,
    Category,
    Price,
    Quantity,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Name,
        FormField::Category,
        FormField::Price,
        FormField::Quantity,
    ];

    fn label(self) -> &'static str {
        match self {
            FormField::Name => "Product Name",
            FormField::Category => "Category",
            FormField::Price => "Unit Price",
            FormField::Quantity => "Quantity in Stock",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|field| *field == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|field| *field == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Text buffers backing the registration screen.
#[derive(Debug, Clone, Default)]
struct RegistrationForm {
    draft: ItemDraft,
    focus: FormField,
}

impl RegistrationForm {
    fn buffer(&self) -> &str {
        match self.focus {
            FormField::Name => &self.draft.name,
            FormField::Category => &self.draft.category,
            FormField::Price => &self.draft.price,
            FormField::Quantity => &self.draft.quantity,
        }
    }

    fn buffer_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.draft.name,
            FormField::Category => &mut self.draft.category,
            FormField::Price => &mut self.draft.price,
            FormField::Quantity => &mut self.draft.quantity,
        }
    }

    fn buffer_for(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.draft.name,
            FormField::Category => &self.draft.category,
            FormField::Price => &self.draft.price,
            FormField::Quantity => &self.draft.quantity,
        }
    }

    fn insert(&mut self, ch: char) {
        let buffer = self.buffer_mut();
        if buffer.len() >= MAX_FIELD_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            buffer.push(ch);
        }
    }

    fn backspace(&mut self) {
        self.buffer_mut().pop();
    }

    fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn clear(&mut self) {
        self.draft = ItemDraft::default();
        self.focus = FormField::Name;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

/// High-level application state for the estoque TUI.
pub struct EstoqueApp {
    config: AppConfig,
    inventory: Inventory,
    screen: Screen,
    form: RegistrationForm,
    detail: Option<Item>,
    state: UiState,
    theme: Theme,
}

impl EstoqueApp {
    pub fn new(config: AppConfig, inventory: Inventory) -> Self {
        Self {
            config,
            inventory,
            screen: Screen::Registration,
            form: RegistrationForm::default(),
            detail: None,
            state: UiState::default(),
            theme: Theme::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        info!(policy = ?self.inventory.policy(), "Estoque TUI started");
        self.state.set_status(
            StatusKind::Info,
            "Fill in the form and press Enter to register".to_string(),
        );

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            // Single-threaded event loop: poll for input, otherwise tick.
            if event::poll(TICK_RATE).context("failed to poll terminal events")? {
                let evt = event::read().context("failed to read terminal event")?;
                self.handle_input(evt)?;
            } else {
                self.handle_tick();
            }
        }

        restore_terminal(&mut terminal)
    }

    fn handle_tick(&mut self) {
        self.state.tick_status();
    }

    fn navigate(&mut self, route: Route) {
        debug!(route = %route, "Navigating");
        match route {
            Route::Registration => {
                self.screen = Screen::Registration;
            }
            Route::List => {
                self.screen = Screen::List;
                self.state.clamp_cursor(self.inventory.len());
            }
            Route::Detail(item) => {
                self.detail = Some(item);
                self.screen = Screen::Detail;
            }
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => match self.screen {
                Screen::Registration => self.handle_registration_key(key)?,
                Screen::List => self.handle_list_key(key)?,
                Screen::Detail => self.handle_detail_key(key)?,
            },
            Event::Resize(_, _) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
        Ok(())
    }

    fn handle_registration_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_prev();
            }
            KeyCode::Enter => {
                self.submit_registration();
            }
            KeyCode::F(2) => {
                self.navigate(Route::List);
            }
            KeyCode::Backspace => {
                self.form.backspace();
            }
            KeyCode::Char('l') if key.modifiers == KeyModifiers::CONTROL => {
                self.navigate(Route::List);
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.form.insert(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_registration(&mut self) {
        let outcome = self
            .form
            .draft
            .validate(self.inventory.policy())
            .and_then(|item| self.inventory.add(item));
        match outcome {
            Ok(()) => {
                info!(total = self.inventory.len(), "Product registered");
                self.form.clear();
                self.state.set_status(
                    StatusKind::Success,
                    "Product registered successfully".to_string(),
                );
                if self.config.navigate_after_register {
                    self.navigate(Route::List);
                }
            }
            Err(err) => {
                debug!(%err, "Registration rejected");
                self.state
                    .set_status(StatusKind::Error, format!("Not registered: {err}"));
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Result<()> {
        let total = self.inventory.len();
        match key.code {
            KeyCode::Esc => {
                self.navigate(Route::Registration);
            }
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.state.should_quit = true;
            }
            KeyCode::Char('n') if key.modifiers.is_empty() => {
                self.navigate(Route::Registration);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1, total),
            KeyCode::Char('g') | KeyCode::Home => self.state.move_to(0, total),
            KeyCode::Char('G') | KeyCode::End => self.state.move_to_end(total),
            KeyCode::PageDown => self.state.page_down(total),
            KeyCode::PageUp => self.state.page_up(total),
            KeyCode::Enter => {
                if let Some(item) = self.inventory.get(self.state.cursor).cloned() {
                    // The detail screen owns a snapshot, so later store
                    // mutations never change what it displays.
                    self.navigate(Route::Detail(item));
                } else {
                    self.state
                        .set_status(StatusKind::Info, "No product selected".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.navigate(Route::List);
            }
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.state.should_quit = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Registration => self.draw_registration(frame),
            Screen::List => self.draw_list(frame),
            Screen::Detail => self.draw_detail(frame),
        }
    }

    fn draw_registration(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            "Cadastro de Produto",
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        for (idx, field) in FormField::ORDER.iter().enumerate() {
            let field_area = chunks[idx + 1];
            let focused = self.form.focus == *field;
            let border_style = if focused {
                Style::default().fg(self.theme.accent)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let text = self.form.buffer_for(*field).to_string();
            let paragraph = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(self.theme.primary_fg),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(field.label()),
            );
            frame.render_widget(paragraph, field_area);

            if focused {
                let cursor_x = (field_area.x + 1 + self.form.buffer().len() as u16)
                    .min(field_area.x + field_area.width.saturating_sub(2));
                frame.set_cursor(cursor_x, field_area.y + 1);
            }
        }

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" next field  "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" register  "),
            Span::styled("F2", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" product list  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]);
        let help = Paragraph::new(help)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(help, chunks[5]);

        self.render_status(frame, chunks[6]);
    }

    fn draw_list(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);
        let list_area = chunks[0];
        let status_area = chunks[1];

        self.state.list_height = list_area.height.saturating_sub(2) as usize;
        let total = self.inventory.len();
        self.state.clamp_cursor(total);
        self.state.ensure_cursor_visible(total);

        let mut list_state = ListState::default();
        let items: Vec<ListItem> = if total == 0 {
            vec![ListItem::new(Line::from(Span::styled(
                "  Nenhum produto cadastrado",
                Style::default().fg(self.theme.muted),
            )))]
        } else {
            let visible = self.state.list_height.max(1);
            let end = (self.state.offset + visible).min(total);
            let shown = end - self.state.offset;
            list_state.select(Some(
                self.state
                    .cursor
                    .saturating_sub(self.state.offset)
                    .min(shown.saturating_sub(1)),
            ));
            self.inventory.items()[self.state.offset..end]
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    let absolute_idx = self.state.offset + idx;
                    let marker = if absolute_idx == self.state.cursor {
                        Span::styled(
                            "▶ ",
                            Style::default()
                                .fg(self.theme.accent)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::raw("  ")
                    };
                    let summary = Span::styled(
                        item.summary(),
                        Style::default().fg(self.theme.primary_fg),
                    );
                    let price = Span::styled(
                        format!(" · {} each", format_price(item.price)),
                        Style::default().fg(self.theme.muted),
                    );
                    ListItem::new(Line::from(vec![marker, summary, price]))
                })
                .collect()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Lista de Produtos");
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, list_area, &mut list_state);

        self.render_status(frame, status_area);
    }

    fn draw_detail(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Detalhes do Produto");
        if let Some(item) = &self.detail {
            let lines = vec![
                Line::from(Span::styled(
                    item.name.clone(),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Category: {}", item.category)),
                Line::from(format!("Unit price: {}", format_price(item.price))),
                Line::from(format!("Quantity in stock: {}", item.quantity)),
                Line::from(format!("Stock value: {}", format_price(item.line_value()))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" back to list  "),
                    Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" quit"),
                ]),
            ];
            let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, chunks[0]);
        } else {
            let paragraph = Paragraph::new("Produto não encontrado.").block(block);
            frame.render_widget(paragraph, chunks[0]);
        }

        self.render_status(frame, chunks[1]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let style = match self.state.status_kind {
            StatusKind::Info => Style::default().fg(self.theme.primary_fg),
            StatusKind::Success => Style::default().fg(self.theme.success),
            StatusKind::Error => Style::default().fg(self.theme.danger),
        };
        let primary = Line::from(Span::styled(self.state.status.clone(), style));
        let secondary = Line::from(Span::styled(
            format!(
                "{} items · total value {} · {} units in stock",
                self.inventory.len(),
                format_price(self.inventory.total_value()),
                self.inventory.total_quantity()
            ),
            Style::default().fg(self.theme.muted),
        ));
        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    status_kind: StatusKind,
    status_ticks: u8,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: String::new(),
            status_kind: StatusKind::Info,
            status_ticks: 0,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, kind: StatusKind, message: String) {
        self.status = message;
        self.status_kind = kind;
        self.status_ticks = STATUS_TICKS;
    }

    fn tick_status(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status.clear();
                self.status_kind = StatusKind::Info;
            }
        }
    }

    fn move_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let len = total as isize;
        let mut idx = self.cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len {
            idx = len - 1;
        }
        self.cursor = idx as usize;
        self.ensure_cursor_visible(total);
    }

    fn move_to(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = index.min(total - 1);
        self.ensure_cursor_visible(total);
    }

    fn move_to_end(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = total - 1;
        self.ensure_cursor_visible(total);
    }

    fn page_down(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(total);
        self.move_cursor(delta as isize, total);
    }

    fn page_up(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(total);
        self.move_cursor(-(delta as isize), total);
    }

    fn clamp_cursor(&mut self, total: usize) {
        if total == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= total {
            self.cursor = total - 1;
        }
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = total.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

fn format_price(value: f64) -> String {
    format!("{value:.2}")
}
