use crate::game::{Board, Cell, Move, Player, COLS, ROWS};
use crate::session::Mode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the game screen shows.
pub struct GameView<'a> {
    pub board: &'a Board,
    pub last_move: Option<Move>,
    /// Disc drawn over the board at (row, col) while it falls
    pub falling: Option<(usize, usize, Player)>,
    pub selected_column: usize,
    pub status: String,
    pub mode: Mode,
    pub can_undo: bool,
}

pub fn render(frame: &mut Frame, view: &GameView<'_>, message: &Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, view.can_undo, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::First => Color::Red,
        Player::Second => Color::Blue,
    }
}

fn render_header(frame: &mut Frame, view: &GameView<'_>, area: ratatui::layout::Rect) {
    let header = Paragraph::new(format!("{}  |  {}", view.status, view.mode.label()))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &GameView<'_>, area: ratatui::layout::Rect) {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        if col == view.selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    // Top border
    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let falling = view
                .falling
                .filter(|&(r, c, _)| r == row && c == col)
                .map(|(_, _, player)| player);
            let is_last = view
                .last_move
                .is_some_and(|m| m.row == row && m.col == col);

            let span = match (falling, view.board.get(row, col)) {
                (Some(player), _) => {
                    Span::styled(" ● ", Style::default().fg(player_color(player)))
                }
                (None, Cell::Empty) => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                (None, Cell::Occupied(player)) if is_last => Span::styled(
                    " ◉ ",
                    Style::default()
                        .fg(player_color(player))
                        .add_modifier(Modifier::BOLD),
                ),
                (None, Cell::Occupied(player)) => {
                    Span::styled(" ● ", Style::default().fg(player_color(player)))
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    // Bottom border
    lines.push(Line::from("  ╚══════════════════════╝"));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, can_undo: bool, area: ratatui::layout::Rect) {
    let line1 = Line::from("←/→: Move  |  Enter or 1-7: Drop  |  Q: Quit");
    let undo_style = if can_undo {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let line2 = Line::from(vec![
        Span::styled("U: Undo", undo_style),
        Span::raw("  |  R: Reset  |  C: Clear save  |  M: PvP/PvE"),
    ]);

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
