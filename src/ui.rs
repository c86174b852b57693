use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tuition_tracker::{
    format_rupiah, Notifier, PaymentForm, PaymentType, Session, SettingChange, StudentId,
    TextSize, Tracker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Students,
    Transactions,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Students,
            Page::Students => Page::Transactions,
            Page::Transactions => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Transactions,
            Page::Students => Page::Dashboard,
            Page::Transactions => Page::Students,
        }
    }

    /// Translation key of the page title
    pub fn title_key(&self) -> &'static str {
        match self {
            Page::Dashboard => "nav_dashboard",
            Page::Students => "nav_students",
            Page::Transactions => "nav_transactions",
        }
    }
}

// ============================================================================
// STATUS LINE NOTIFIER
// ============================================================================

/// Alerts land in the status bar. Confirmation is answered by the key
/// handler: pressing `y` approves the next question.
#[derive(Debug, Default)]
pub struct StatusLine {
    pub message: Option<String>,
    approved: bool,
}

impl StatusLine {
    pub fn approve_next(&mut self) {
        self.approved = true;
    }
}

impl Notifier for StatusLine {
    fn confirm(&mut self, _message: &str) -> bool {
        std::mem::take(&mut self.approved)
    }

    fn alert(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub session: Session<StatusLine>,
    pub current_page: Page,
    pub students_state: TableState,
    pub transactions_state: TableState,
    /// Student waiting for a y/n answer before deletion
    pub pending_delete: Option<StudentId>,
    pub export_dir: PathBuf,
}

impl App {
    pub fn new(tracker: Tracker, export_dir: PathBuf) -> Self {
        let mut students_state = TableState::default();
        if !tracker.students().is_empty() {
            students_state.select(Some(0));
        }

        let mut transactions_state = TableState::default();
        if !tracker.transactions().is_empty() {
            transactions_state.select(Some(0));
        }

        Self {
            session: Session::new(tracker, StatusLine::default()),
            current_page: Page::Dashboard,
            students_state,
            transactions_state,
            pending_delete: None,
            export_dir,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        self.session.tracker()
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.session.t(key)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.session.notifier().message.as_deref()
    }

    fn set_status(&mut self, message: String) {
        self.session.notifier_mut().alert(&message);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn selected_student(&self) -> Option<StudentId> {
        self.students_state
            .selected()
            .and_then(|i| self.tracker().students().get(i))
            .map(|s| s.id)
    }

    fn active_table(&mut self) -> Option<(&mut TableState, usize)> {
        match self.current_page {
            Page::Students => Some((&mut self.students_state, self.session.tracker().students().len())),
            Page::Transactions => Some((
                &mut self.transactions_state,
                self.session.tracker().transactions().len(),
            )),
            Page::Dashboard => None,
        }
    }

    pub fn next(&mut self) {
        let Some((state, len)) = self.active_table() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let Some((state, len)) = self.active_table() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let Some((state, len)) = self.active_table() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let Some((state, _)) = self.active_table() else {
            return;
        };
        let i = state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        state.select(Some(i));
    }

    fn select_last(&mut self) {
        if let Some((state, len)) = self.active_table() {
            if len > 0 {
                state.select(Some(len - 1));
            }
        }
    }

    /// Keep selections inside the tables after rows come and go.
    fn clamp_selections(&mut self) {
        let students = self.tracker().students().len();
        let transactions = self.tracker().transactions().len();

        for (state, len) in [
            (&mut self.students_state, students),
            (&mut self.transactions_state, transactions),
        ] {
            match (state.selected(), len) {
                (_, 0) => state.select(None),
                (None, _) => state.select(Some(0)),
                (Some(i), len) if i >= len => state.select(Some(len - 1)),
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn request_delete(&mut self) {
        if self.current_page == Page::Students {
            self.pending_delete = self.selected_student();
        }
    }

    pub fn answer_delete(&mut self, yes: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if yes {
            self.session.notifier_mut().approve_next();
        }
        self.session.delete_student(id);
        self.clamp_selections();
    }

    /// Record one full monthly fee for the selected student, billed to the
    /// reference month.
    pub fn quick_pay(&mut self) {
        let Some(id) = self.selected_student() else {
            return;
        };
        let config = self.tracker().config().clone();

        let mut form = PaymentForm::for_student(id);
        form.payment_type = PaymentType::Spp;
        form.month = config.reference_month;
        form.amount = config.monthly_fee;
        self.session.payment_form = form;

        if let Some(tx) = self.session.submit_payment() {
            let message = format!(
                "{}: {} {}",
                self.t("alert_payment_saved"),
                self.tracker().student_name(tx.student_id),
                format_rupiah(tx.amount)
            );
            self.set_status(message);
        }
        self.clamp_selections();
    }

    pub fn export(&mut self) -> Result<PathBuf> {
        let file = self.session.export();
        let path = self.export_dir.join(&file.filename);
        std::fs::write(&path, file.contents)?;

        let message = format!("{} {}", self.t("alert_export_success"), path.display());
        self.set_status(message);
        Ok(path)
    }

    pub fn import_text(&mut self, text: &str) {
        self.session.import_text(text);
        self.clamp_selections();
    }

    /// Apply one key press. Returns `false` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') => self.answer_delete(true),
                KeyCode::Char('n') | KeyCode::Esc => self.answer_delete(false),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
            }
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('p') if self.current_page == Page::Students => self.quick_pay(),
            KeyCode::Char('e') => {
                if let Err(e) = self.export() {
                    self.set_status(format!("Export failed: {}", e));
                }
            }
            KeyCode::Char('l') => {
                let language = self.tracker().settings().language.toggle();
                self.session.update_settings(SettingChange::Language(language));
            }
            KeyCode::Char('m') => {
                let dark = !self.tracker().settings().dark_mode;
                self.session.update_settings(SettingChange::DarkMode(dark));
            }
            KeyCode::Char('z') => {
                let size = self.tracker().settings().text_size.next();
                self.session.update_settings(SettingChange::TextSize(size));
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => {
                if let Some((state, _)) = self.active_table() {
                    state.select(Some(0));
                }
            }
            KeyCode::End => self.select_last(),
            _ => {}
        }
        true
    }

    fn palette(&self) -> Palette {
        if self.tracker().settings().dark_mode {
            Palette {
                bg: Color::Rgb(15, 23, 42),
                fg: Color::Rgb(241, 245, 249),
                muted: Color::Rgb(148, 163, 184),
                border: Color::Rgb(51, 65, 85),
            }
        } else {
            Palette {
                bg: Color::Reset,
                fg: Color::Reset,
                muted: Color::DarkGray,
                border: Color::White,
            }
        }
    }

    fn row_height(&self) -> u16 {
        match self.tracker().settings().text_size {
            TextSize::Large => 2,
            TextSize::Small | TextSize::Normal => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    border: Color,
}

impl Palette {
    fn block(&self, title: String) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .style(Style::default().bg(self.bg).fg(self.fg))
            .title(title)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Students => render_students(f, chunks[1], app),
        Page::Transactions => render_transactions(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let settings = app.tracker().settings();

    let mut tab_spans = vec![Span::styled(
        format!("{}  ", app.t("app_title")),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in [Page::Dashboard, Page::Students, Page::Transactions]
        .iter()
        .enumerate()
    {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.muted)
        };

        tab_spans.push(Span::styled(app.t(page.title_key()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format_rupiah(app.tracker().total_collected()),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!(
            "{} · {} · {}",
            settings.language.code(),
            if settings.dark_mode { "dark" } else { "light" },
            settings.text_size.as_str()
        ),
        Style::default().fg(palette.muted),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(palette.bg).fg(palette.fg)),
    );

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let tracker = app.tracker();
    let stats = tracker.monthly_stats();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[0]);

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let figures = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {}: ", app.t("stat_total_collected")), label),
            Span::styled(
                format_rupiah(tracker.total_collected()),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("  {}: ", app.t("stat_total_transactions")), label),
            Span::raw(tracker.total_transactions().to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {}: ", app.t("stat_monthly_target")), label),
            Span::raw(format_rupiah(stats.monthly_target)),
            Span::styled(
                format!(" ({})", tracker.config().reference_month),
                Style::default().fg(palette.muted),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("  {}: ", app.t("stat_collected_month")), label),
            Span::raw(format_rupiah(stats.current_month_spp)),
        ]),
        Line::from(vec![
            Span::styled(format!("  {}: ", app.t("stat_paid_count")), label),
            Span::raw(format!("{}/{}", stats.paid_count, tracker.students().len())),
        ]),
    ];

    f.render_widget(
        Paragraph::new(figures).block(palette.block(format!(" {} ", app.t("nav_dashboard")))),
        left[0],
    );

    let gauge = Gauge::default()
        .block(palette.block(format!(" {} ", app.t("stat_monthly_target"))))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(stats.percentage.min(100) as u16)
        .label(format!("{}%", stats.percentage));
    f.render_widget(gauge, left[1]);

    render_chart(f, columns[1], app);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let chart = app.tracker().chart_data();
    let bar_width = 30.0;

    let mut lines = vec![Line::from("")];

    if chart.is_placeholder() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "█".repeat(bar_width as usize),
                Style::default().fg(hex_color(&chart.empty_color)),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", app.t("chart_empty")),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    } else {
        for slice in &chart.data {
            let filled = ((slice.percentage / 100.0) * bar_width).round() as usize;
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{:<12}", slice.label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(hex_color(&slice.color))),
                Span::raw(format!(
                    " {:>5.1}%  {}",
                    slice.percentage,
                    format_rupiah(slice.value)
                )),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Total: ", Style::default().fg(Color::Cyan)),
            Span::raw(format_rupiah(chart.total)),
        ]));
    }

    f.render_widget(
        Paragraph::new(lines).block(palette.block(format!(" {} ", app.t("chart_title")))),
        area,
    );
}

fn header_row(labels: Vec<&str>) -> Row<'static> {
    let cells: Vec<Cell> = labels
        .into_iter()
        .map(|h| {
            Cell::from(h.to_string()).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_students(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.palette();
    let height = app.row_height();
    let tracker = app.session.tracker();

    let header = header_row(vec![
        app.t("th_nis"),
        app.t("th_name"),
        app.t("th_class"),
        app.t("th_status"),
        app.t("th_amount"),
    ]);

    let rows: Vec<Row> = tracker
        .students()
        .iter()
        .map(|s| {
            let paid = tracker
                .transactions_for(s.id)
                .iter()
                .map(|tx| tx.amount)
                .fold(0, u64::saturating_add);
            let color = if s.is_active() { Color::Green } else { palette.muted };

            Row::new(vec![
                Cell::from(s.nis.clone()),
                Cell::from(truncate(&s.name, 28)),
                Cell::from(s.class.clone()),
                Cell::from(s.status.label()).style(Style::default().fg(color)),
                Cell::from(format_rupiah(paid)),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(30),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(palette.block(format!(" {} ", app.t("nav_students"))))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.students_state);
}

fn render_transactions(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.palette();
    let height = app.row_height();
    let tracker = app.session.tracker();

    let header = header_row(vec![
        app.t("th_date"),
        app.t("th_student"),
        app.t("th_type"),
        app.t("label_month_bill"),
        app.t("label_year_bill"),
        app.t("th_amount"),
        app.t("th_status"),
    ]);

    let rows: Vec<Row> = tracker
        .transactions()
        .iter()
        .map(|tx| {
            let color = match tx.payment_type {
                PaymentType::Spp => Color::Green,
                PaymentType::BuildingFund => Color::Blue,
                PaymentType::Materials => Color::Yellow,
                PaymentType::Uniform => Color::Magenta,
                PaymentType::Charity => Color::Red,
                PaymentType::Other => palette.muted,
            };

            Row::new(vec![
                Cell::from(tx.date.clone()),
                Cell::from(truncate(tracker.student_name(tx.student_id), 24)),
                Cell::from(tx.payment_type.label()).style(Style::default().fg(color)),
                Cell::from(tx.month.clone()),
                Cell::from(tx.year.clone()),
                Cell::from(format_rupiah(tx.amount)).style(Style::default().fg(color)),
                Cell::from(tx.status.label()),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(26),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(palette.block(format!(" {} ", app.t("nav_transactions"))))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.transactions_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let key = Style::default().fg(Color::Yellow);

    let status_spans = if let Some(id) = app.pending_delete {
        vec![
            Span::styled(
                format!(" {} ", app.t("alert_delete_confirm")),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({}) ", app.tracker().student_name(id))),
            Span::styled(app.t("hint_confirm"), key),
        ]
    } else {
        let mut spans = Vec::new();
        if let Some(message) = app.status_message() {
            spans.push(Span::styled(
                format!(" {} ", message),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::raw("|"));
        }
        spans.push(Span::styled(" Tab", key));
        spans.push(Span::raw(" Page | "));
        if app.current_page == Page::Students {
            spans.push(Span::styled("p", key));
            spans.push(Span::raw(" Pay | "));
            spans.push(Span::styled("d", key));
            spans.push(Span::raw(" Delete | "));
        }
        spans.push(Span::styled("e", key));
        spans.push(Span::raw(" Export | "));
        spans.push(Span::styled("l", key));
        spans.push(Span::raw(" Lang | "));
        spans.push(Span::styled("m", key));
        spans.push(Span::raw(" Theme | "));
        spans.push(Span::styled("z", key));
        spans.push(Span::raw(" Size | "));
        spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" Quit"));
        spans
    };

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(palette.bg).fg(palette.fg)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// `#rrggbb` to a terminal color.
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::White;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}
