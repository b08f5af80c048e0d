use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Colors;
use crate::buffer::{cell_index, LINE_WIDTH};
use crate::encoding::CharEncoding;

/// HEX列の開始位置
const HEX_COLUMN: u16 = 11;
/// 文字列の開始位置
const TEXT_COLUMN: u16 = 61;

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Hex,
    Ascii,
}

/// 編集中のカーソル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCursor {
    pub x: usize,
    pub y: usize,
    pub high_nibble: bool,
    pub mode: ViewMode,
}

impl EditCursor {
    /// ペイン内での端末カーソル位置
    pub fn position(&self, area: Rect) -> Position {
        let x = self.x as u16;
        let column = match self.mode {
            ViewMode::Ascii => TEXT_COLUMN + x,
            ViewMode::Hex => HEX_COLUMN + 3 * x + u16::from(!self.high_nibble),
        } + x / 8;
        Position::new(area.x + column, area.y + 1 + self.y as u16)
    }
}

/// 1ファイル分のHEX/文字表示ウィジェット
pub struct HexView<'a> {
    /// 表示するデータ（有効部分のみ）
    data: &'a [u8],
    /// data[0] のファイル上の位置
    offset: u64,
    /// 表示行数
    num_lines: usize,
    /// ペイン上端に表示するファイル名
    title: &'a str,
    /// 差分マスク
    diffs: Option<&'a [bool]>,
    /// 文字セット
    encoding: CharEncoding,
}

impl<'a> HexView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            num_lines: 0,
            title: "",
            diffs: None,
            encoding: CharEncoding::Ascii,
        }
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn num_lines(mut self, num_lines: usize) -> Self {
        self.num_lines = num_lines;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn diffs(mut self, diffs: Option<&'a [bool]>) -> Self {
        self.diffs = diffs;
        self
    }

    pub fn encoding(mut self, encoding: CharEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// アドレス文字列を生成（上位16ビットと下位16ビット）
    fn format_addr(addr: u64) -> String {
        format!("{:04X} {:04X}:", (addr >> 16) & 0xFFFF, addr & 0xFFFF)
    }

    fn is_diff(&self, index: usize) -> bool {
        self.diffs
            .and_then(|mask| mask.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// 1行分のデータを描画
    fn render_row(&self, row: usize, x: u16, y: u16, buf: &mut Buffer) {
        let normal = Style::default().fg(Colors::FILE_FG);
        let diff = Style::default()
            .fg(Colors::DIFF_FG)
            .bg(Colors::DIFF_BG)
            .add_modifier(Modifier::BOLD);

        let addr = self.offset + (row * LINE_WIDTH) as u64;
        buf.set_string(x, y, Self::format_addr(addr), normal);

        for col in 0..LINE_WIDTH {
            let index = cell_index(row, col);
            let Some(&byte) = self.data.get(index) else {
                break;
            };
            let style = if self.is_diff(index) { diff } else { normal };
            let gap = u16::from(col >= 8);
            let col = col as u16;

            buf.set_string(x + HEX_COLUMN + 3 * col + gap, y, format!("{:02X}", byte), style);
            buf.set_string(
                x + TEXT_COLUMN + col + gap,
                y,
                self.encoding.glyph(byte).to_string(),
                style,
            );
        }
    }
}

impl Widget for HexView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // ファイル名の行
        let title_style = Style::default()
            .fg(Colors::FILE_NAME_FG)
            .bg(Colors::FILE_NAME_BG);
        buf.set_style(Rect { height: 1, ..area }, title_style);
        buf.set_string(area.x, area.y, self.title, title_style);

        let visible_rows = (area.height as usize - 1).min(self.num_lines);
        for row in 0..visible_rows {
            self.render_row(row, area.x, area.y + 1 + row as u16, buf);
        }
    }
}
