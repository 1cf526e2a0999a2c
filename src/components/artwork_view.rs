use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::artwork::Artwork;

/// Draws artwork with `▀` half blocks, two pixel rows per cell, centred in
/// the area. Transparent pixels keep the background.
pub struct ArtworkView<'a> {
    artwork: &'a Artwork,
}

impl<'a> ArtworkView<'a> {
    pub fn new(artwork: &'a Artwork) -> Self {
        Self { artwork }
    }

    /// Cells needed to show the whole image
    pub fn size(&self) -> (u16, u16) {
        let width = u16::try_from(self.artwork.width).unwrap_or(u16::MAX);
        let height = u16::try_from(self.artwork.height.div_ceil(2)).unwrap_or(u16::MAX);
        (width, height)
    }
}

impl Widget for ArtworkView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.size();
        let width = width.min(area.width);
        let height = height.min(area.height);
        let left = area.x + (area.width - width) / 2;
        let top = area.y + (area.height - height) / 2;

        for row in 0..height {
            for column in 0..width {
                let x = u32::from(column);
                let upper = self.artwork.pixel(x, u32::from(row) * 2);
                let lower = self.artwork.pixel(x, u32::from(row) * 2 + 1);
                let (symbol, style) = match (upper, lower) {
                    (Some(up), Some(down)) => ("▀", Style::default().fg(rgb(up)).bg(rgb(down))),
                    (Some(up), None) => ("▀", Style::default().fg(rgb(up))),
                    (None, Some(down)) => ("▄", Style::default().fg(rgb(down))),
                    (None, None) => continue,
                };
                if let Some(cell) = buf.cell_mut((left + column, top + row)) {
                    cell.set_symbol(symbol).set_style(style);
                }
            }
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork() -> Artwork {
        // 2x3: top-left transparent, rest red
        let mut pixels = Vec::new();
        for index in 0..6 {
            let alpha = if index == 0 { 0 } else { 255 };
            pixels.extend([255, 0, 0, alpha]);
        }
        Artwork {
            width: 2,
            height: 3,
            pixels,
        }
    }

    #[test]
    fn test_size_halves_rows() {
        assert_eq!(ArtworkView::new(&artwork()).size(), (2, 2));
    }

    #[test]
    fn test_half_blocks() {
        let art = artwork();
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        ArtworkView::new(&art).render(area, &mut buf);

        let symbols: Vec<&str> = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert_eq!(symbols, vec!["▄", "▀", "▀", "▀"]);
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(0, 1)].bg, Color::Reset);
    }
}
