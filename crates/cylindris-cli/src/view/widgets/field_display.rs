use std::iter;

use cylindris_engine::Field;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::CellDisplay;

/// Grid of cells sized to whatever field it is given.
#[derive(Debug)]
pub struct FieldDisplay<'a> {
    field: &'a Field,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FieldDisplay<'a> {
    pub fn new(field: &'a Field) -> Self {
        Self { field, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.field.size().width * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.field.size().height * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let size = self.field.size();
        let col_constraints = (0..size.width).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..size.height).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        for (row_area, row) in iter::zip(vertical.split(area).iter(), self.field.rows()) {
            for (cell_area, cell) in iter::zip(horizontal.split(*row_area).iter(), row) {
                CellDisplay::from_cell(*cell).render(*cell_area, buf);
            }
        }
    }
}
