use tracing::{info, warn};

use super::Key;
use crate::buffer::{BufferError, FileView, Side, LINE_WIDTH};
use crate::encoding::CharEncoding;
use crate::ui::ViewMode;

/// 編集モード中の入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Up,
    Down,
    Left,
    Right,
    /// HEX <-> ASCII
    ToggleMode,
    Input(char),
    /// 相手側ファイルの同じ位置のバイトをコピー
    CopyFromPeer,
    Done,
}

impl EditKey {
    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::Up => EditKey::Up,
            Key::Down => EditKey::Down,
            Key::Left | Key::Backspace | Key::Delete => EditKey::Left,
            Key::Right => EditKey::Right,
            Key::Tab => EditKey::ToggleMode,
            Key::Enter => EditKey::CopyFromPeer,
            Key::Escape => EditKey::Done,
            Key::Char(c) => EditKey::Input(c),
            _ => return None,
        })
    }
}

/// キー処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStep {
    Continue,
    /// 変更なしで終了
    Finished,
    /// 変更あり、保存するか確認が必要
    ConfirmSave,
    /// 書き込みできないので変更を破棄して終了
    DiscardedReadOnly,
}

/// 保存確認への回答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
}

/// 1つのビューに対するバイト単位の編集セッション
#[derive(Debug, Clone)]
pub struct EditSession {
    side: Side,
    x: usize,
    y: usize,
    high_nibble: bool,
    mode: ViewMode,
    dirty: bool,
    read_only: bool,
    num_lines: usize,
    encoding: CharEncoding,
}

impl EditSession {
    /// 編集を開始する
    ///
    /// ウィンドウが完全にEOFを越えている場合は None。
    /// 書き込み可能にできなければ読み取り専用のまま編集を続ける。
    pub fn begin(side: Side, target: &mut FileView, encoding: CharEncoding) -> Option<Self> {
        if !target.is_bound() || (target.contents() == 0 && target.offset() > 0) {
            return None;
        }

        let read_only = match target.promote_to_writable() {
            Ok(()) => false,
            Err(e) => {
                warn!(error = %e, "editing without write access");
                true
            }
        };

        Some(Self {
            side,
            x: 0,
            y: 0,
            high_nibble: true,
            mode: ViewMode::Hex,
            dirty: false,
            read_only,
            num_lines: target.num_lines().max(1),
            encoding,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn high_nibble(&self) -> bool {
        self.high_nibble
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// キー入力を処理
    pub fn handle_key(
        &mut self,
        key: EditKey,
        target: &mut FileView,
        peer: Option<&FileView>,
    ) -> EditStep {
        match key {
            EditKey::Up => self.cursor_up(),
            EditKey::Down => self.cursor_down(),
            EditKey::Left => self.cursor_left(),
            EditKey::Right => self.cursor_right(),
            EditKey::ToggleMode => {
                self.high_nibble = true;
                self.mode = match self.mode {
                    ViewMode::Hex => ViewMode::Ascii,
                    ViewMode::Ascii => ViewMode::Hex,
                };
            }
            EditKey::Input(ch) => self.input(ch, target),
            EditKey::CopyFromPeer => self.copy_from_peer(target, peer),
            EditKey::Done => return self.done(target),
        }
        EditStep::Continue
    }

    /// 保存確認の回答に従って終了する
    pub fn finish(self, choice: SaveChoice, target: &mut FileView) -> Result<(), BufferError> {
        match choice {
            SaveChoice::Save => target.commit_edits(),
            SaveChoice::Discard => {
                info!(side = ?self.side, "discarding edits");
                target.reload();
                Ok(())
            }
        }
    }

    fn done(&self, target: &mut FileView) -> EditStep {
        if !self.dirty {
            EditStep::Finished
        } else if self.read_only {
            target.reload();
            EditStep::DiscardedReadOnly
        } else {
            EditStep::ConfirmSave
        }
    }

    fn input(&mut self, ch: char, target: &mut FileView) {
        let value = match self.mode {
            ViewMode::Hex => {
                let Some(digit) = ch.to_digit(16) else {
                    return;
                };
                let digit = digit as u8;
                let current = target.byte_at(self.x, self.y);
                if self.high_nibble {
                    (digit << 4) | (current & 0x0F)
                } else {
                    (current & 0xF0) | digit
                }
            }
            ViewMode::Ascii => match self.encoding.encode_char(ch) {
                Some(byte) => byte,
                None => return,
            },
        };

        self.write(target, value);
        self.cursor_right();
    }

    fn copy_from_peer(&mut self, target: &mut FileView, peer: Option<&FileView>) {
        let Some(byte) = peer.and_then(|p| p.window().get(self.linear_index()).copied()) else {
            return;
        };
        self.write(target, byte);
        // モードに関係なく次のバイトへ
        self.high_nibble = true;
        self.next_column();
    }

    fn write(&mut self, target: &mut FileView, value: u8) {
        target.set_byte(self.x, self.y, value);
        self.dirty = true;
    }

    fn linear_index(&self) -> usize {
        crate::buffer::cell_index(self.y, self.x)
    }

    fn cursor_up(&mut self) {
        self.y = if self.y == 0 { self.num_lines - 1 } else { self.y - 1 };
    }

    fn cursor_down(&mut self) {
        self.y += 1;
        if self.y >= self.num_lines {
            self.y = 0;
        }
    }

    fn cursor_left(&mut self) {
        if !self.high_nibble {
            self.high_nibble = true;
            return;
        }
        if self.mode == ViewMode::Hex {
            self.high_nibble = false;
        }
        if self.x == 0 {
            self.x = LINE_WIDTH - 1;
            self.cursor_up();
        } else {
            self.x -= 1;
        }
    }

    fn cursor_right(&mut self) {
        if self.high_nibble && self.mode == ViewMode::Hex {
            self.high_nibble = false;
            return;
        }
        self.high_nibble = true;
        self.next_column();
    }

    fn next_column(&mut self) {
        self.x += 1;
        if self.x >= LINE_WIDTH {
            self.x = 0;
            self.cursor_down();
        }
    }
}
