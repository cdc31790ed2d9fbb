//! Row layout of the diagram.
//!
//! Values are placed right to left. Each value goes on the newest row unless
//! it would reach the value placed just before it, in which case a new row
//! is opened below. Every row above a value gets a `|` at its column.

use pa_runtime::CapturedValue;

use crate::matcher::CapturedDisplayEvent;
use crate::width::{char_width, text_width};

/// One display column. A wide character fills its own cell and marks the
/// following one as covered so that later columns stay aligned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cell {
    Char(char),
    Covered,
}

const BLANK: Cell = Cell::Char(' ');

type Row = Vec<Cell>;

pub struct DiagramRenderer<'a> {
    line: &'a str,
    width: usize,
    rows: Vec<Row>,
}

impl<'a> DiagramRenderer<'a> {
    /// Renderer for the statement text `line`.
    pub fn new(line: &'a str) -> Self {
        let width = text_width(line);
        DiagramRenderer {
            line,
            width,
            rows: vec![vec![BLANK; width], vec![BLANK; width]],
        }
    }

    /// Lay out `events` under the line. The first output line is the
    /// statement itself, then the marker row, then value rows in the order
    /// they were opened.
    pub fn render<V: CapturedValue>(mut self, mut events: Vec<CapturedDisplayEvent<V>>) -> String {
        events.sort_by(|a, b| b.column.cmp(&a.column));

        let mut prev_column = None;
        for event in &events {
            let dumped = event.value.dump();
            if let Some(prev) = prev_column {
                if prev <= event.column + text_width(&dumped) {
                    self.rows.push(vec![BLANK; self.width]);
                }
            }
            self.stamp_bars(event.column);
            self.write_value(event.column, &dumped);
            prev_column = Some(event.column);
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.line.to_string());
        lines.extend(self.rows.iter().map(|row| row_text(row)));
        lines.join("\n")
    }

    fn stamp_bars(&mut self, column: usize) {
        let last = self.rows.len() - 1;
        for row in &mut self.rows[..last] {
            set_cell(row, column, Cell::Char('|'));
        }
    }

    fn write_value(&mut self, column: usize, dumped: &str) {
        let last = self.rows.len() - 1;
        let row = &mut self.rows[last];
        let mut at = column;
        for ch in dumped.chars() {
            set_cell(row, at, Cell::Char(ch));
            if char_width(ch) == 2 {
                set_cell(row, at + 1, Cell::Covered);
            }
            at += char_width(ch);
        }
    }
}

fn set_cell(row: &mut Row, column: usize, cell: Cell) {
    if row.len() <= column {
        row.resize(column + 1, BLANK);
    }
    row[column] = cell;
}

fn row_text(row: &[Cell]) -> String {
    row.iter()
        .filter_map(|cell| match cell {
            Cell::Char(ch) => Some(*ch),
            Cell::Covered => None,
        })
        .collect()
}
