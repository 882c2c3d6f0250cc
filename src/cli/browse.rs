use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    DefaultTerminal, Frame,
};

use crate::cli::open_storage;
use crate::error::{KakeiboError, Result};
use crate::fmt::with_suffix;
use crate::models::EntryForm;
use crate::session::Session;
use crate::settings::load_settings;
use crate::storage::Storage;
use crate::tui::{self, Canvas, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE};

const FIELD_LABELS: [&str; 4] = ["Date", "Category", "Memo", "Amount"];

pub enum BrowseAction {
    Continue,
    Close,
}

struct FormState {
    fields: [String; 4],
    focus: usize,
}

impl FormState {
    fn new() -> Self {
        Self {
            fields: [today(), String::new(), String::new(), String::new()],
            focus: 1,
        }
    }

    fn to_entry(&self) -> EntryForm {
        EntryForm::new(&self.fields[0], &self.fields[1], &self.fields[2], &self.fields[3])
    }
}

enum Mode {
    Normal,
    Form(FormState),
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Interactive ledger: expense table on the left, category chart on the
/// right, entry form at the bottom when open.
pub struct ExpenseBrowser<S: Storage> {
    session: Session<S, Canvas>,
    suffix: String,
    mode: Mode,
    status_message: Option<(String, bool)>,
    table_state: TableState,
}

impl<S: Storage> ExpenseBrowser<S> {
    pub fn new(session: Session<S, Canvas>, suffix: &str) -> Self {
        let mut table_state = TableState::default();
        if !session.ledger().is_empty() {
            table_state.select(Some(session.ledger().len() - 1));
        }
        Self {
            session,
            suffix: suffix.to_string(),
            mode: Mode::Normal,
            status_message: None,
            table_state,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<S, Canvas> {
        &self.session
    }

    fn row_count(&self) -> usize {
        self.session
            .renderer()
            .table()
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    fn selected_id(&self) -> Option<i64> {
        let idx = self.table_state.selected()?;
        self.session.renderer().table()?.rows.get(idx).map(|r| r.id)
    }

    fn clamp_selection(&mut self) {
        let count = self.row_count();
        if count == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(count - 1);
            self.table_state.select(Some(idx));
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> BrowseAction {
        if matches!(self.mode, Mode::Form(_)) {
            self.handle_form_key(code);
            return BrowseAction::Continue;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return BrowseAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                let idx = self.table_state.selected().unwrap_or(0);
                self.table_state.select(Some(idx.saturating_sub(1)));
                self.clamp_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let idx = self.table_state.selected().map_or(0, |i| i + 1);
                self.table_state.select(Some(idx));
                self.clamp_selection();
            }
            KeyCode::Char('a') => {
                self.status_message = None;
                self.mode = Mode::Form(FormState::new());
            }
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            _ => {}
        }
        BrowseAction::Continue
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status_message = None;
            }
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % FIELD_LABELS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + FIELD_LABELS.len() - 1) % FIELD_LABELS.len()
            }
            KeyCode::Backspace => {
                form.fields[form.focus].pop();
            }
            KeyCode::Char(c) => form.fields[form.focus].push(c),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Mode::Form(form) = &self.mode else {
            return;
        };
        let entry = form.to_entry();
        match self.session.submit_entry(&entry) {
            Ok(id) => {
                self.mode = Mode::Normal;
                self.status_message = Some((format!("Added expense #{id}"), false));
                self.table_state.select(Some(self.row_count().saturating_sub(1)));
            }
            // Keep the form as typed so the user can fix it
            Err(KakeiboError::Validation(reason)) => {
                self.status_message = Some((reason.to_string(), true));
            }
            Err(e) => {
                self.status_message = Some((format!("Save failed: {e}"), true));
            }
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.session.delete_entry(id) {
            Ok(()) => {
                self.status_message = Some((format!("Deleted expense #{id}"), false));
                self.clamp_selection();
            }
            Err(e) => self.status_message = Some((format!("Delete failed: {e}"), true)),
        }
    }

    /// Draw the browser into the given frame. Callable from an external event loop.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let form_height: u16 = if matches!(self.mode, Mode::Form(_)) { 6 } else { 0 };
        let [title_area, body_area, form_area, status_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(form_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new("Kakeibo").style(HEADER_STYLE), title_area);

        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(body_area);
        self.draw_table(frame, table_area);
        self.draw_chart(frame, chart_area);

        if let Mode::Form(form) = &self.mode {
            draw_form(frame, form_area, form);
        }

        if let Some((msg, is_error)) = &self.status_message {
            let style = if *is_error { ERROR_STYLE } else { Style::default() };
            frame.render_widget(Paragraph::new(Span::styled(msg.as_str(), style)), status_area);
        }

        let keys = match self.mode {
            Mode::Normal => " a add  d delete  \u{2191}\u{2193} select  q quit",
            Mode::Form(_) => " Tab next field  Enter save  Esc cancel",
        };
        frame.render_widget(Paragraph::new(keys).style(FOOTER_STYLE), keys_area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let Some(view) = self.session.renderer().table() else {
            return;
        };
        let [list_area, total_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        let memo_width = list_area.width.saturating_sub(6 + 10 + 14 + 12 + 4) as usize;
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|r| {
                let (memo, lines) = tui::wrap_text(&r.memo, memo_width.max(8));
                Row::new(vec![
                    Cell::from(r.id.to_string()),
                    Cell::from(r.date.clone()),
                    Cell::from(r.category.clone()),
                    Cell::from(memo),
                    Cell::from(Line::from(tui::amount_span(r.amount)).right_aligned()),
                ])
                .height(lines)
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Fill(1),
            Constraint::Length(12),
        ];
        let header = Row::new(vec!["ID", "Date", "Category", "Memo", "Amount"])
            .style(HEADER_STYLE)
            .bottom_margin(1);
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, list_area, &mut self.table_state);

        let total = Line::from(vec![
            Span::styled(" Total  ", HEADER_STYLE),
            tui::amount_span(view.total),
        ]);
        frame.render_widget(Paragraph::new(total), total_area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" By Category ").borders(Borders::LEFT);
        let Some(view) = self.session.renderer().chart() else {
            frame.render_widget(block, area);
            return;
        };
        if view.is_empty() {
            frame.render_widget(Paragraph::new(" No data").style(FOOTER_STYLE).block(block), area);
            return;
        }

        let bars: Vec<Bar> = view
            .slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                Bar::default()
                    .value(slice.amount.abs().round() as u64)
                    .label(Line::from(slice.category.clone()))
                    .text_value(format!(
                        "{} ({:.0}%)",
                        with_suffix(slice.amount, &self.suffix),
                        slice.share * 100.0
                    ))
                    .style(Style::default().fg(tui::segment_color(i)))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    pub fn run(&mut self) -> Result<()> {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw_frame(frame))?;

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break;
                }
                match self.handle_key(code) {
                    BrowseAction::Close => break,
                    BrowseAction::Continue => {}
                }
            }
        }
        Ok(())
    }
}

fn draw_form(frame: &mut Frame, area: Rect, form: &FormState) {
    let block = Block::default().title(" New expense ").borders(Borders::TOP);
    let lines: Vec<Line> = FIELD_LABELS
        .iter()
        .zip(form.fields.iter())
        .enumerate()
        .map(|(i, (label, value))| {
            let focused = i == form.focus;
            let marker = if focused { "\u{25b8}" } else { " " };
            let cursor = if focused { "_" } else { "" };
            let style = if focused { SELECTED_STYLE } else { Style::default() };
            Line::from(vec![
                Span::raw(format!("{marker} {label:<9}")),
                Span::styled(format!("{value}{cursor}"), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let storage = open_storage(&settings)?;
    let session = Session::startup(storage, Canvas::default(), &settings.currency_suffix)?;
    ExpenseBrowser::new(session, &settings.currency_suffix).run()
}
