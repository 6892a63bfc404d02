use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};
use rosetris_engine::{GameSession, SessionState};

use super::{BoardView, PiecePreview, StatsView};

/// The whole play screen: board, NEXT stack, HOLD box, stats, the help line,
/// and the state overlays (title, pause, game over).
#[derive(Debug)]
pub(crate) struct SessionScreen<'a> {
    session: &'a GameSession,
}

impl<'a> SessionScreen<'a> {
    pub(crate) fn new(session: &'a GameSession) -> Self {
        Self { session }
    }
}

impl Widget for SessionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        render_help(self.session, help_area, buf);

        if self.session.state().is_at_rest() && !self.session.is_game_over() {
            render_title_screen(main_area, buf);
            return;
        }

        let board_area = render_board_column(self.session, main_area, buf);

        match self.session.state() {
            SessionState::Paused => {
                render_overlay(&["PAUSED", "", "P  resume"], board_area, buf);
            }
            SessionState::AtRest => {
                let score_line = format!("Score {}", self.session.score());
                render_overlay(
                    &["GAME OVER", "", &score_line, "", "Enter  play again"],
                    board_area,
                    buf,
                );
            }
            SessionState::Running => {}
        }
    }
}

/// Renders the board and the side panels; returns the board's outer area so
/// overlays can center on it.
fn render_board_column(session: &GameSession, area: Rect, buf: &mut Buffer) -> Rect {
    let next_height = PiecePreview::height() * 3 + 4;
    let hold_height = PiecePreview::height() + 2;
    let side_height = next_height + hold_height + StatsView::height() + 2 + 2;
    let side_width = PiecePreview::width() + 6;

    let [board_area, side_area] = Layout::horizontal([
        Constraint::Length(BoardView::width() + 2),
        Constraint::Length(side_width),
    ])
    .flex(Flex::Center)
    .spacing(1)
    .areas(area);
    let [board_area] = Layout::vertical([Constraint::Length(BoardView::height() + 2)])
        .flex(Flex::Center)
        .areas(board_area);
    let [side_area] = Layout::vertical([Constraint::Length(side_height)])
        .flex(Flex::Center)
        .areas(side_area);

    let board_block = Block::bordered().title(Line::from(" rosetris ").centered());
    let board_inner = board_block.inner(board_area);
    board_block.render(board_area, buf);
    BoardView::new(session).render(board_inner, buf);

    let [next_area, hold_area, stats_area] = Layout::vertical([
        Constraint::Length(next_height),
        Constraint::Length(hold_height),
        Constraint::Length(StatsView::height() + 2),
    ])
    .spacing(1)
    .areas(side_area);

    let next_block = Block::bordered().title(Line::from("NEXT").centered());
    let next_inner = next_block.inner(next_area);
    next_block.render(next_area, buf);
    let [first, _, second, _, third] = Layout::vertical([
        Constraint::Length(PiecePreview::height()),
        Constraint::Length(1),
        Constraint::Length(PiecePreview::height()),
        Constraint::Length(1),
        Constraint::Length(PiecePreview::height()),
    ])
    .areas(next_inner);
    let preview = session.queue_preview();
    PiecePreview::new(Some(preview[0])).render(first, buf);
    PiecePreview::new(Some(preview[1])).render(second, buf);
    PiecePreview::new(Some(preview[2])).render(third, buf);

    let hold_block = Block::bordered().title(Line::from("HOLD").centered());
    let hold_inner = hold_block.inner(hold_area);
    hold_block.render(hold_area, buf);
    PiecePreview::new(session.held_piece()).render(hold_inner, buf);

    let stats_block = Block::bordered().title(Line::from("STATS").centered());
    let stats_inner = stats_block.inner(stats_area);
    stats_block.render(stats_area, buf);
    StatsView::new(session).render(stats_inner, buf);

    board_area
}

fn render_title_screen(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from("R O S E T R I S").centered(),
        Line::from(""),
        Line::from("Enter  start").centered(),
        Line::from("Q      quit").centered(),
    ];
    let [text_area] = Layout::vertical([Constraint::Length(4)])
        .flex(Flex::Center)
        .areas(area);
    Paragraph::new(Text::from(lines)).render(text_area, buf);
}

#[expect(clippy::cast_possible_truncation)]
fn render_overlay(lines: &[&str], area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16 + 2;
    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0) as u16 + 4;
    let [overlay_area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay_area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(overlay_area);

    Clear.render(overlay_area, buf);
    let text: Vec<Line> = lines.iter().map(|line| Line::from(*line).centered()).collect();
    Paragraph::new(Text::from(text))
        .block(Block::bordered())
        .render(overlay_area, buf);
}

fn render_help(session: &GameSession, area: Rect, buf: &mut Buffer) {
    let help = match session.state() {
        SessionState::Running => {
            "← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | H (Hold) | P (Pause) | R (Restart) | Q (Quit)"
        }
        SessionState::Paused => "P (Resume) | Q (Quit)",
        SessionState::AtRest => "Enter (Start) | Q (Quit)",
    };
    Paragraph::new(Line::from(help))
        .style(Style::default().fg(Color::DarkGray))
        .centered()
        .render(area, buf);
}
