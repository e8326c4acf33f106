/// Character canvas that strokes wireframe polylines for terminal output
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wf3d_core::{Point2, Polyline};

const EDGE: char = '#';
const EMPTY: char = ' ';

/// Terminal cells are about twice as tall as they are wide, so one raster
/// pixel spans two columns.
const CELL_ASPECT: f64 = 2.0;

/// Segments reaching further than this many canvas sizes off screen are
/// dropped rather than walked cell by cell.
const MAX_REACH: f64 = 4.0;

/// A grid of terminal cells that polylines are stroked into.
pub struct WireframeCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl WireframeCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Side in pixels of the largest square raster the canvas can show.
    pub fn raster_size(&self) -> u32 {
        let fit = self.height.min((self.width as f64 / CELL_ASPECT) as usize);
        fit.max(1) as u32
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Mark one cell. Cells outside the canvas are ignored.
    pub fn plot(&mut self, col: i64, row: i64) {
        if col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height {
            self.cells[row as usize * self.width + col as usize] = EDGE;
        }
    }

    /// Bresenham line between two cells, both ends included.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64)) {
        let (x1, y1) = to;
        let dx = (x1 - from.0).abs();
        let dy = -(y1 - from.1).abs();
        let sx = if from.0 < x1 { 1 } else { -1 };
        let sy = if from.1 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = from;

        loop {
            self.plot(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Stroke every polyline, mapping a `raster` pixel square onto the
    /// canvas with +y pointing up and the square centered horizontally.
    pub fn stroke(&mut self, polylines: &[Polyline], raster: u32) {
        let offset = (self.width as f64 - raster as f64 * CELL_ASPECT).max(0.0) / 2.0;
        for polyline in polylines {
            for (a, b) in polyline.segments() {
                if let (Some(from), Some(to)) = (self.cell(a, raster, offset), self.cell(b, raster, offset)) {
                    self.line(from, to);
                }
            }
        }
    }

    fn cell(&self, p: Point2, raster: u32, offset: f64) -> Option<(i64, i64)> {
        let col = (p.x * CELL_ASPECT + offset).floor();
        let row = (raster as f64 - p.y).floor();
        let reach = MAX_REACH * self.width.max(self.height) as f64;
        if !col.is_finite() || !row.is_finite() || col.abs() > reach || row.abs() > reach {
            return None;
        }
        Some((col as i64, row as i64))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for (row, cells) in self.cells.chunks(self.width.max(1)).enumerate() {
            let line: String = cells.iter().collect();
            writer.queue(cursor::MoveTo(0, row as u16))?;
            writer.queue(Print(line))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
