use thiserror::Error;

/// 必要な画面幅
pub const SCREEN_WIDTH: u16 = 80;
/// プロンプト領域の高さ
pub const PROMPT_HEIGHT: u16 = 4;
/// 必要な画面の高さ
pub const MIN_SCREEN_HEIGHT: u16 = PROMPT_HEIGHT + 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("The screen must be at least {} characters wide.", SCREEN_WIDTH)]
    TooNarrow,
    #[error("The screen must be at least {} lines high.", MIN_SCREEN_HEIGHT)]
    TooShort,
}

/// 端末サイズから求めた画面配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// 1ファイルあたりの表示行数
    pub num_lines: usize,
    /// 上下のペインの間の空き行
    pub lines_between: u16,
    pub single: bool,
}

impl ScreenLayout {
    pub fn compute(cols: u16, rows: u16, single: bool) -> Result<Self, LayoutError> {
        if cols < SCREEN_WIDTH {
            return Err(LayoutError::TooNarrow);
        }
        if rows < MIN_SCREEN_HEIGHT {
            return Err(LayoutError::TooShort);
        }

        let mut num_lines = rows - PROMPT_HEIGHT - if single { 1 } else { 2 };
        let mut lines_between = 0;
        if !single {
            lines_between = num_lines % 2;
            num_lines = (num_lines - lines_between) / 2;
        }

        Ok(Self {
            num_lines: num_lines as usize,
            lines_between,
            single,
        })
    }

    /// ペインの高さ（ファイル名の行を含む）
    pub fn pane_height(&self) -> u16 {
        self.num_lines as u16 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_layout_on_standard_terminal() {
        let layout = ScreenLayout::compute(80, 25, false).unwrap();
        // 25 - 4 - 2 = 19 -> 1行空けて 9行ずつ
        assert_eq!(layout.num_lines, 9);
        assert_eq!(layout.lines_between, 1);
        assert_eq!(layout.pane_height(), 10);
    }

    #[test]
    fn single_layout_uses_whole_screen() {
        let layout = ScreenLayout::compute(120, 25, true).unwrap();
        assert_eq!(layout.num_lines, 20);
        assert_eq!(layout.lines_between, 0);
    }

    #[test]
    fn minimum_geometry() {
        assert_eq!(ScreenLayout::compute(79, 25, false), Err(LayoutError::TooNarrow));
        assert_eq!(ScreenLayout::compute(80, 7, false), Err(LayoutError::TooShort));
        let layout = ScreenLayout::compute(80, 8, false).unwrap();
        assert_eq!(layout.num_lines, 1);
    }
}
