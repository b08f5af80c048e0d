mod edit;
mod goto;
mod layout;
mod nav;
mod state;

pub use edit::{EditKey, EditSession, EditStep, SaveChoice};
pub use goto::{GotoPrompt, PromptStep, GOTO_FIELD_WIDTH};
pub use layout::{LayoutError, ScreenLayout, MIN_SCREEN_HEIGHT, PROMPT_HEIGHT, SCREEN_WIDTH};
pub use nav::{apply_goto, dispatch, LockState, NavContext, Outcome};
pub use state::App;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::buffer::Side;

/// 抽象キー（端末固有のキーコードはここで吸収する）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Backspace,
    Delete,
    Enter,
    Escape,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyMod {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Key {
    /// crossterm のキーイベントを抽象キーに変換
    pub fn from_event(event: &KeyEvent) -> Option<(Key, KeyMod)> {
        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            _ => return None,
        };
        let mods = KeyMod {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        };
        Some((key, mods))
    }
}

/// 移動の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveUnit {
    Byte,
    Line,
    Page,
    /// 先頭または末尾まで
    All,
}

/// 移動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// コマンドの対象ビュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub top: bool,
    pub bottom: bool,
}

impl Targets {
    pub const BOTH: Targets = Targets { top: true, bottom: true };
    pub const TOP: Targets = Targets { top: true, bottom: false };
    pub const BOTTOM: Targets = Targets { top: false, bottom: true };

    pub fn includes(self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.top && !self.bottom
    }
}

/// アプリケーションコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move {
        unit: MoveUnit,
        direction: Direction,
        targets: Targets,
    },
    /// 位置入力ダイアログを開く
    Goto(Targets),
    NextDifference,
    /// 上だけ動かす（下をロック）
    ToggleTopLock,
    /// 下だけ動かす（上をロック）
    ToggleBottomLock,
    ToggleCharacterSet,
    EditTop,
    EditBottom,
    /// ロックされていない側を編集
    EditActive,
    Quit,
    None,
}

impl Command {
    /// キーからコマンドに変換
    pub fn from_key(key: Key, mods: KeyMod, single: bool) -> Self {
        // Ctrl は上だけ、Alt は下だけ
        let targets = if mods.ctrl {
            Targets::TOP
        } else if mods.alt && !single {
            Targets::BOTTOM
        } else {
            Targets::BOTH
        };
        let movement = |unit, direction| Command::Move {
            unit,
            direction,
            targets,
        };

        match key {
            Key::Down => movement(MoveUnit::Line, Direction::Forward),
            Key::Up => movement(MoveUnit::Line, Direction::Backward),
            Key::Right => movement(MoveUnit::Byte, Direction::Forward),
            Key::Left => movement(MoveUnit::Byte, Direction::Backward),
            Key::PageDown => movement(MoveUnit::Page, Direction::Forward),
            Key::PageUp => movement(MoveUnit::Page, Direction::Backward),
            Key::End => movement(MoveUnit::All, Direction::Forward),
            Key::Home => movement(MoveUnit::All, Direction::Backward),

            Key::Enter => Command::NextDifference,
            Key::Escape => Command::Quit,

            Key::Char(c) => match (c.to_ascii_uppercase(), mods.ctrl, mods.alt) {
                ('C', true, _) => Command::Quit,
                ('Q', false, false) => Command::Quit,
                ('E', true, false) => Command::EditTop,
                ('E', false, true) if !single => Command::EditBottom,
                ('E', false, false) => Command::EditActive,
                ('G', true, false) => Command::Goto(Targets::TOP),
                ('G', false, true) if !single => Command::Goto(Targets::BOTTOM),
                ('G', false, false) => Command::Goto(Targets::BOTH),
                ('C', false, false) => Command::ToggleCharacterSet,
                ('T', false, false) if !single => Command::ToggleTopLock,
                ('B', false, false) if !single => Command::ToggleBottomLock,
                _ => Command::None,
            },

            _ => Command::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: KeyMod = KeyMod {
        ctrl: false,
        shift: false,
        alt: false,
    };
    const CTRL: KeyMod = KeyMod {
        ctrl: true,
        shift: false,
        alt: false,
    };
    const ALT: KeyMod = KeyMod {
        ctrl: false,
        shift: false,
        alt: true,
    };

    #[test]
    fn arrows_move_both() {
        assert_eq!(
            Command::from_key(Key::Down, PLAIN, false),
            Command::Move {
                unit: MoveUnit::Line,
                direction: Direction::Forward,
                targets: Targets::BOTH,
            }
        );
        assert_eq!(
            Command::from_key(Key::Home, PLAIN, false),
            Command::Move {
                unit: MoveUnit::All,
                direction: Direction::Backward,
                targets: Targets::BOTH,
            }
        );
    }

    #[test]
    fn modifiers_pick_one_side() {
        let Command::Move { targets, .. } = Command::from_key(Key::PageDown, CTRL, false) else {
            panic!("expected move");
        };
        assert_eq!(targets, Targets::TOP);

        let Command::Move { targets, .. } = Command::from_key(Key::Right, ALT, false) else {
            panic!("expected move");
        };
        assert_eq!(targets, Targets::BOTTOM);
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(Command::from_key(Key::Char('q'), PLAIN, false), Command::Quit);
        assert_eq!(Command::from_key(Key::Char('Q'), PLAIN, false), Command::Quit);
        assert_eq!(Command::from_key(Key::Char('e'), PLAIN, false), Command::EditActive);
        assert_eq!(Command::from_key(Key::Char('c'), PLAIN, false), Command::ToggleCharacterSet);
        assert_eq!(Command::from_key(Key::Char('c'), CTRL, false), Command::Quit);
        assert_eq!(Command::from_key(Key::Char('e'), ALT, false), Command::EditBottom);
    }

    #[test]
    fn lock_keys_disabled_in_single_mode() {
        assert_eq!(Command::from_key(Key::Char('t'), PLAIN, false), Command::ToggleTopLock);
        assert_eq!(Command::from_key(Key::Char('b'), PLAIN, false), Command::ToggleBottomLock);
        assert_eq!(Command::from_key(Key::Char('t'), PLAIN, true), Command::None);
        assert_eq!(Command::from_key(Key::Char('b'), PLAIN, true), Command::None);
        assert_eq!(Command::from_key(Key::Char('e'), ALT, true), Command::None);
    }

    #[test]
    fn goto_follows_modifier_side() {
        assert_eq!(
            Command::from_key(Key::Char('g'), PLAIN, false),
            Command::Goto(Targets::BOTH)
        );
        assert_eq!(
            Command::from_key(Key::Char('g'), CTRL, false),
            Command::Goto(Targets::TOP)
        );
        assert_eq!(
            Command::from_key(Key::Char('G'), ALT, false),
            Command::Goto(Targets::BOTTOM)
        );
        // 単一ファイルでは下側がない
        assert_eq!(Command::from_key(Key::Char('g'), ALT, true), Command::None);
    }
}
