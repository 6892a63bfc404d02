use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};
use rosetris_engine::GameSession;

/// Score, level, and total line count.
#[derive(Debug)]
pub(crate) struct StatsView<'a> {
    session: &'a GameSession,
}

impl<'a> StatsView<'a> {
    pub(crate) fn new(session: &'a GameSession) -> Self {
        Self { session }
    }

    pub(crate) const fn height() -> u16 {
        3
    }
}

impl Widget for StatsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(format!("Score {:>7}", self.session.score())),
            Line::from(format!("Level {:>7}", self.session.level())),
            Line::from(format!("Lines {:>7}", self.session.total_lines())),
        ];
        Paragraph::new(Text::from(lines)).render(area, buf);
    }
}
