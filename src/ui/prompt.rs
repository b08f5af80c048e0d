use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::{Colors, ViewMode};
use crate::app::LockState;
use crate::encoding::CharEncoding;

/// プロンプト領域に表示する内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpKind {
    Normal,
    Edit { mode: ViewMode, read_only: bool },
    ConfirmSave,
}

/// 画面下部のヘルプ表示
pub struct HelpBar<'a> {
    kind: HelpKind,
    encoding: CharEncoding,
    lock: LockState,
    single: bool,
    status: Option<&'a str>,
}

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::default().fg(Colors::PROMPT_KEY))
}

fn text(label: &str) -> Span<'_> {
    Span::styled(label, Style::default().fg(Colors::PROMPT_FG))
}

/// 選択中の項目は反転表示
fn choice(label: &str, active: bool) -> Span<'_> {
    if active {
        Span::styled(
            label,
            Style::default()
                .fg(Colors::CURRENT_MODE_FG)
                .bg(Colors::CURRENT_MODE_BG),
        )
    } else {
        text(label)
    }
}

impl<'a> HelpBar<'a> {
    pub fn new(kind: HelpKind) -> Self {
        Self {
            kind,
            encoding: CharEncoding::Ascii,
            lock: LockState::None,
            single: false,
            status: None,
        }
    }

    pub fn encoding(mut self, encoding: CharEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn lock(mut self, lock: LockState) -> Self {
        self.lock = lock;
        self
    }

    pub fn single(mut self, single: bool) -> Self {
        self.single = single;
        self
    }

    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    fn charset_spans(&self) -> [Span<'static>; 3] {
        [
            choice("ASCII", self.encoding == CharEncoding::Ascii),
            text(" "),
            choice("EBCDIC", self.encoding == CharEncoding::Ebcdic),
        ]
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match self.kind {
            HelpKind::Normal => {
                let mut first = vec![
                    key("Arrows"),
                    text(" move  "),
                    key("Enter"),
                    text(" next difference  "),
                    key("G"),
                    text(" goto  "),
                    key("E"),
                    text(" edit  "),
                    key("Q"),
                    text(" quit  "),
                    key("C"),
                    text(" "),
                ];
                first.extend(self.charset_spans());

                let second = if self.single {
                    vec![
                        key("PgUp PgDn"),
                        text(" page  "),
                        key("Home End"),
                        text(" start/end of file"),
                    ]
                } else {
                    vec![
                        key("Ctrl"),
                        text(" top only  "),
                        key("Alt"),
                        text(" bottom only  "),
                        key("T"),
                        text(" "),
                        choice("move top", self.lock == LockState::BottomLocked),
                        text("  "),
                        key("B"),
                        text(" "),
                        choice("move bottom", self.lock == LockState::TopLocked),
                    ]
                };
                vec![Line::from(first), Line::from(second)]
            }
            HelpKind::Edit { mode, read_only } => {
                let mut first = vec![
                    key("Arrows"),
                    text(" move  "),
                    key("Tab"),
                    text(" hex/text  "),
                ];
                if !self.single {
                    first.push(key("Enter"));
                    first.push(text(" copy from other file  "));
                }
                first.push(key("Esc"));
                first.push(text(" done"));

                let mut second = match mode {
                    ViewMode::Hex => vec![text("Type hex digits 0-9 A-F")],
                    ViewMode::Ascii => {
                        let mut spans = vec![text("Type characters as ")];
                        spans.extend(self.charset_spans());
                        spans
                    }
                };
                if read_only {
                    second.push(text("  "));
                    second.push(choice("read only", true));
                }
                vec![Line::from(first), Line::from(second)]
            }
            HelpKind::ConfirmSave => vec![
                Line::from(vec![text("Save changes? "), key("Y"), text(" save")]),
                Line::from(text("Any other key discards the changes")),
            ],
        }
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Colors::PROMPT_BORDER));
        if let Some(status) = self.status {
            block = block.title_bottom(Span::styled(
                format!(" {} ", status),
                Style::default()
                    .fg(Colors::STATUS)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(self.lines()).block(block).render(area, buf);
    }
}

/// 位置入力用のポップアップ
pub struct GotoBox<'a> {
    input: &'a str,
}

impl<'a> GotoBox<'a> {
    const LABEL: &'static str = "Offset (hex): ";
    const WIDTH: u16 = 32;
    const HEIGHT: u16 = 3;

    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// 画面中央のポップアップ領域
    pub fn area(screen: Rect) -> Rect {
        let width = Self::WIDTH.min(screen.width);
        let height = Self::HEIGHT.min(screen.height);
        Rect {
            x: screen.x + (screen.width - width) / 2,
            y: screen.y + (screen.height - height) / 2,
            width,
            height,
        }
    }

    /// 入力位置のカーソル
    pub fn cursor_position(&self, area: Rect) -> Position {
        let column = 1 + Self::LABEL.len() + self.input.len();
        Position::new(area.x + column as u16, area.y + 1)
    }
}

impl Widget for GotoBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Colors::PROMPT_BORDER))
            .title(" Goto ");
        let line = Line::from(vec![text(Self::LABEL), key(self.input)]);
        Paragraph::new(line).block(block).render(area, buf);
    }
}
