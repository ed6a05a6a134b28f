use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::{debug, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::WorkoutStore;
use crate::error::ValidationError;
use crate::models::WorkoutRecord;

use super::forms::WorkoutField;
use super::helpers::{button, centered_rect, hint_line, surface_error};
use super::screens::{Focus, WorkoutScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows taken by the form block: four inputs plus the border.
const FORM_HEIGHT: u16 = 6;

/// The two places the user can be. Leaving the workouts screen drops its
/// state, so coming back always starts from a blank form and a fresh load.
enum Screen {
    Home,
    Workouts(WorkoutScreen),
}

/// Overlays drawn on top of the active screen.
enum Mode {
    Normal,
    Alert(Alert),
}

/// Blocking message that swallows input until dismissed.
struct Alert {
    title: String,
    message: String,
}

impl Alert {
    fn validation(err: &ValidationError) -> Self {
        Self {
            title: "Missing information".to_string(),
            message: err.to_string(),
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// What a key press on the workouts screen asks the app to do once the
/// screen borrow is released.
enum Action {
    None,
    Quit,
    GoHome,
    Submit,
    DeleteSelected,
}

/// Central application state shared across the TUI.
pub struct App {
    store: WorkoutStore,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: WorkoutStore) -> Self {
        Self {
            store,
            screen: Screen::Home,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    /// Hand the store back so `main` can close it explicitly.
    pub fn into_store(self) -> WorkoutStore {
        self.store
    }

    /// Route a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Alert(alert) => handle_alert_key(code, alert),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let action = match self.screen {
            Screen::Home => match code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Enter => {
                    self.open_workouts()?;
                    Action::None
                }
                _ => Action::None,
            },
            Screen::Workouts(ref mut screen) => workouts_key(screen, code),
        };

        match action {
            Action::None => {}
            Action::Quit => *exit = true,
            Action::GoHome => self.go_home(),
            Action::Submit => return self.submit_workout(),
            Action::DeleteSelected => self.delete_selected()?,
        }
        Ok(Mode::Normal)
    }

    fn open_workouts(&mut self) -> Result<()> {
        let screen = WorkoutScreen::load(&self.store)?;
        debug!("opened workouts screen with {} records", screen.records.len());
        self.screen = Screen::Workouts(screen);
        self.clear_status();
        Ok(())
    }

    fn go_home(&mut self) {
        if let Screen::Workouts(screen) = &self.screen {
            if !screen.form.is_empty() {
                debug!("discarding unsaved workout input");
            }
        }
        debug!("returning to home screen");
        self.screen = Screen::Home;
        self.clear_status();
    }

    /// Validate the form, insert, then clear the inputs and reload the list.
    /// A validation failure leaves both the table and the form untouched.
    fn submit_workout(&mut self) -> Result<Mode> {
        let Screen::Workouts(ref mut screen) = self.screen else {
            return Ok(Mode::Normal);
        };

        let workout = match screen.form.submission() {
            Ok(workout) => workout,
            Err(err) => {
                warn!("rejected workout submission: {err}");
                return Ok(Mode::Alert(Alert::validation(&err)));
            }
        };

        match self.store.insert(&workout) {
            Ok(record) => {
                screen.form.clear();
                screen.focus_list();
                screen.select_first();
                screen.reload(&self.store)?;
                self.set_status(format!("Saved {record}."), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
        Ok(Mode::Normal)
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Screen::Workouts(ref mut screen) = self.screen else {
            return Ok(());
        };
        let Some(record) = screen.current_record().cloned() else {
            self.set_status("No workout selected to delete.", StatusKind::Error);
            return Ok(());
        };

        match self.store.delete(record.id) {
            Ok(()) => {
                screen.reload(&self.store)?;
                self.set_status(format!("Deleted {record}."), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Home => self.draw_home(frame, content_area),
            Screen::Workouts(screen) => self.draw_workouts(frame, content_area, screen),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Alert(alert) => self.draw_alert(frame, area, alert),
            Mode::Normal => {}
        }
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 50, area);
        let block = Block::default()
            .title(" Workout Tracker ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(""),
            Line::from("Keep a local log of your training sessions."),
            Line::from(""),
            Line::from(button("Go to workouts", true)),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_workouts(&self, frame: &mut Frame, area: Rect, screen: &WorkoutScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            "Workouts",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        self.draw_form(frame, chunks[1], screen);

        let buttons = Line::from(vec![
            button("Save workout", false),
            Span::raw("  "),
            button("Back to start", false),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[2],
        );

        self.draw_record_list(frame, chunks[3], screen);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, screen: &WorkoutScreen) {
        let form_focused = screen.focus == Focus::Form;
        let border_style = if form_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title("New workout")
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines: Vec<Line> = WorkoutField::ALL
            .into_iter()
            .map(|field| screen.form.build_line(field, form_focused))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if form_focused && matches!(self.mode, Mode::Normal) {
            let field = screen.form.active;
            let row = WorkoutField::ALL
                .iter()
                .position(|candidate| *candidate == field)
                .unwrap_or(0) as u16;
            if row < inner.height {
                let x = inner
                    .x
                    .saturating_add(screen.form.cursor_offset(field))
                    .min(inner.right().saturating_sub(1));
                frame.set_cursor_position((x, inner.y + row));
            }
        }
    }

    fn draw_record_list(&self, frame: &mut Frame, area: Rect, screen: &WorkoutScreen) {
        let list_focused = screen.focus == Focus::List;
        let block = Block::default()
            .title(format!("Saved workouts ({})", screen.records.len()))
            .borders(Borders::ALL)
            .border_style(if list_focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            });

        if screen.records.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No workouts yet. Fill in the form and press Enter.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = screen.records.iter().map(record_item).collect();
        let highlight = if list_focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(screen.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        if matches!(self.mode, Mode::Alert(_)) {
            return hint_line(&[("Enter/Esc", "dismiss")]);
        }
        match &self.screen {
            Screen::Home => hint_line(&[("Enter", "go to workouts"), ("q", "quit")]),
            Screen::Workouts(screen) => match screen.focus {
                Focus::Form => hint_line(&[
                    ("Enter", "save workout"),
                    ("Tab/↓", "next field"),
                    ("Shift+Tab/↑", "previous field"),
                    ("Esc", "back to start"),
                ]),
                Focus::List => hint_line(&[
                    ("↑/↓", "select"),
                    ("d/Del", "delete"),
                    ("Tab/i", "edit form"),
                    ("Esc", "back to start"),
                    ("q", "quit"),
                ]),
            },
        }
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(alert.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(alert.message.clone()),
            Line::from(""),
            Line::from(button("OK", true)),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn handle_alert_key(code: KeyCode, alert: Alert) -> Mode {
    match code {
        KeyCode::Enter | KeyCode::Esc => Mode::Normal,
        _ => Mode::Alert(alert),
    }
}

/// Key handling for the workouts screen. Anything that needs the store is
/// returned as an [`Action`] for the caller to run.
fn workouts_key(screen: &mut WorkoutScreen, code: KeyCode) -> Action {
    match screen.focus {
        Focus::Form => match code {
            KeyCode::Esc => Action::GoHome,
            KeyCode::Enter => Action::Submit,
            KeyCode::Tab | KeyCode::Down => {
                match screen.form.active.next() {
                    Some(field) => screen.focus_form(field),
                    None => screen.focus_list(),
                }
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(field) = screen.form.active.previous() {
                    screen.focus_form(field);
                }
                Action::None
            }
            KeyCode::Backspace => {
                screen.form.backspace();
                Action::None
            }
            KeyCode::Char(ch) => {
                screen.form.push_char(ch);
                Action::None
            }
            _ => Action::None,
        },
        Focus::List => match code {
            KeyCode::Esc => Action::GoHome,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Up => {
                screen.move_selection(-1);
                Action::None
            }
            KeyCode::Down => {
                screen.move_selection(1);
                Action::None
            }
            KeyCode::PageUp => {
                screen.move_selection(-5);
                Action::None
            }
            KeyCode::PageDown => {
                screen.move_selection(5);
                Action::None
            }
            KeyCode::Home => {
                screen.select_first();
                Action::None
            }
            KeyCode::End => {
                screen.select_last();
                Action::None
            }
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Char('X') => {
                Action::DeleteSelected
            }
            KeyCode::Tab | KeyCode::Char('i') => {
                screen.focus_form(WorkoutField::Activity);
                Action::None
            }
            KeyCode::BackTab => {
                screen.focus_form(WorkoutField::Partner);
                Action::None
            }
            _ => Action::None,
        },
    }
}

/// One list row: every field on its own line plus the delete marker.
fn record_item(record: &WorkoutRecord) -> ListItem<'static> {
    let label = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![
            Span::styled("Activity: ", label),
            Span::styled(
                record.activity.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("[X]", Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled("Duration (min): ", label),
            Span::raw(record.duration_minutes.clone()),
        ]),
        Line::from(vec![
            Span::styled("Category: ", label),
            Span::raw(record.category.clone()),
        ]),
        Line::from(vec![
            Span::styled("Training partner: ", label),
            Span::raw(record.partner_name.clone()),
        ]),
        Line::from(""),
    ];
    ListItem::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewWorkout;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        App::new(WorkoutStore::open_in_memory().unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    /// Fill the four fields in tab order. The cursor ends on the partner field.
    fn fill_form(app: &mut App, activity: &str, duration: &str, category: &str, partner: &str) {
        type_text(app, activity);
        press(app, KeyCode::Tab);
        type_text(app, duration);
        press(app, KeyCode::Tab);
        type_text(app, category);
        press(app, KeyCode::Tab);
        type_text(app, partner);
    }

    fn workouts(app: &App) -> &WorkoutScreen {
        match &app.screen {
            Screen::Workouts(screen) => screen,
            Screen::Home => panic!("expected the workouts screen"),
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn enter_on_home_opens_workouts_with_loaded_records() {
        let mut app = app();
        app.store()
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", ""))
            .unwrap();

        assert!(matches!(app.screen, Screen::Home));
        press(&mut app, KeyCode::Enter);

        let screen = workouts(&app);
        assert_eq!(screen.records.len(), 1);
        assert_eq!(screen.focus, Focus::Form);
    }

    #[test]
    fn q_quits_from_home_but_types_inside_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(workouts(&app).form.activity, "q");

        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn submit_saves_clears_form_and_reloads_list() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, " Corrida ", "30", "Cardio", "");
        press(&mut app, KeyCode::Enter);

        let screen = workouts(&app);
        assert!(screen.form.is_empty());
        assert_eq!(screen.focus, Focus::List);
        assert_eq!(screen.records.len(), 1);
        assert_eq!(screen.records[0].activity, "Corrida");
        assert_eq!(screen.records[0].partner_name, "");
        assert_eq!(app.store().count().unwrap(), 1);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn missing_required_field_raises_alert_and_keeps_input() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, "Corrida", "   ", "Cardio", "Bruna");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Alert(_)));
        assert_eq!(app.store().count().unwrap(), 0);

        // Typing while the alert is up must not reach the form.
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));

        let screen = workouts(&app);
        assert_eq!(screen.form.activity, "Corrida");
        assert_eq!(screen.form.duration, "   ");
        assert_eq!(screen.form.category, "Cardio");
        assert_eq!(screen.form.partner, "Bruna");
        assert_eq!(screen.focus, Focus::Form);
    }

    #[test]
    fn delete_from_list_reloads_and_ignores_empty_list() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, "Corrida", "30", "Cardio", "");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        fill_form(&mut app, "Musculação", "45", "Força", "Bruna");
        press(&mut app, KeyCode::Enter);

        let activities: Vec<_> = workouts(&app)
            .records
            .iter()
            .map(|r| r.activity.clone())
            .collect();
        assert_eq!(activities, vec!["Musculação", "Corrida"]);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        let screen = workouts(&app);
        assert_eq!(screen.records.len(), 1);
        assert_eq!(screen.records[0].activity, "Musculação");

        press(&mut app, KeyCode::Delete);
        assert!(workouts(&app).records.is_empty());
        press(&mut app, KeyCode::Delete);
        assert!(workouts(&app).records.is_empty());
        assert_eq!(app.store().count().unwrap(), 0);
    }

    #[test]
    fn leaving_the_screen_discards_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Yoga");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::Home));

        press(&mut app, KeyCode::Enter);
        assert!(workouts(&app).form.is_empty());
    }

    #[test]
    fn field_navigation_wraps_into_the_list() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(workouts(&app).form.active, WorkoutField::Partner);
        press(&mut app, KeyCode::Down);
        assert_eq!(workouts(&app).focus, Focus::List);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(workouts(&app).focus, Focus::Form);
        assert_eq!(workouts(&app).form.active, WorkoutField::Partner);
        press(&mut app, KeyCode::Up);
        assert_eq!(workouts(&app).form.active, WorkoutField::Category);
    }

    #[test]
    fn home_screen_shows_navigation_control() {
        let app = app();
        let screen = render(&app);
        assert!(screen.contains("Workout Tracker"));
        assert!(screen.contains("[ Go to workouts ]"));
    }

    #[test]
    fn workouts_screen_renders_form_and_rows() {
        let mut app = app();
        app.store()
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", "Bruna"))
            .unwrap();
        press(&mut app, KeyCode::Enter);

        let screen = render(&app);
        assert!(screen.contains("Weights, Running, ..."));
        assert!(screen.contains("[ Save workout ]"));
        assert!(screen.contains("[ Back to start ]"));
        assert!(screen.contains("Activity: Corrida"));
        assert!(screen.contains("Duration (min): 30"));
        assert!(screen.contains("Category: Cardio"));
        assert!(screen.contains("Training partner: Bruna"));
        assert!(screen.contains("[X]"));
    }

    #[test]
    fn alert_is_drawn_over_the_screen() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        let screen = render(&app);
        assert!(screen.contains("Missing information"));
        assert!(screen.contains("Please fill in"));
    }
}
