use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

const LABEL_STYLE: Style = Style::new().fg(Color::DarkGray);
const VALUE_STYLE: Style = Style::new().fg(Color::White);

/// Label/value rows for the side panel.
#[derive(Debug, Default)]
pub struct StatusDisplay<'a> {
    rows: Vec<(&'static str, String)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatusDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, label: &'static str, value: impl ToString) -> Self {
        self.rows.push((label, value.to_string()));
        self
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for StatusDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let label_width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let lines = self.rows.into_iter().map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<label_width$}  "), LABEL_STYLE),
                Span::styled(value, VALUE_STYLE),
            ])
        });
        Text::from_iter(lines).render(area, buf);
    }
}
