mod hex_view;
mod prompt;

pub use hex_view::{EditCursor, HexView, ViewMode};
pub use prompt::{GotoBox, HelpBar, HelpKind};

use ratatui::style::Color;

/// 配色
pub struct Colors;

impl Colors {
    pub const FILE_NAME_FG: Color = Color::Black;
    pub const FILE_NAME_BG: Color = Color::Cyan;
    pub const FILE_FG: Color = Color::White;
    pub const DIFF_FG: Color = Color::Yellow;
    pub const DIFF_BG: Color = Color::Red;
    pub const PROMPT_FG: Color = Color::Gray;
    pub const PROMPT_KEY: Color = Color::Yellow;
    pub const PROMPT_BORDER: Color = Color::Blue;
    pub const CURRENT_MODE_FG: Color = Color::Black;
    pub const CURRENT_MODE_BG: Color = Color::Green;
    pub const STATUS: Color = Color::LightRed;
}
