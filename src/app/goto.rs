use super::{Key, Targets};

/// 入力できる16進数の最大桁数
pub const GOTO_FIELD_WIDTH: usize = 8;

/// 位置入力の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    Pending,
    Cancelled,
    Confirmed(u64),
}

/// 位置入力ダイアログ（16進数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoPrompt {
    targets: Targets,
    input: String,
}

impl GotoPrompt {
    pub fn new(targets: Targets) -> Self {
        Self {
            targets,
            input: String::with_capacity(GOTO_FIELD_WIDTH),
        }
    }

    pub fn targets(&self) -> Targets {
        self.targets
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: Key) -> PromptStep {
        match key {
            Key::Char(c) if c.is_ascii_hexdigit() => {
                // 桁あふれは無視
                if self.input.len() < GOTO_FIELD_WIDTH {
                    self.input.push(c.to_ascii_uppercase());
                }
                PromptStep::Pending
            }
            Key::Backspace | Key::Delete | Key::Left => {
                self.input.pop();
                PromptStep::Pending
            }
            Key::Escape => PromptStep::Cancelled,
            Key::Enter if self.input.is_empty() => PromptStep::Cancelled,
            Key::Enter => match u64::from_str_radix(&self.input, 16) {
                Ok(offset) => PromptStep::Confirmed(offset),
                Err(_) => PromptStep::Cancelled,
            },
            _ => PromptStep::Pending,
        }
    }
}
