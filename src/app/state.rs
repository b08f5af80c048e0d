use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};
use tracing::{debug, info};

use super::{
    apply_goto, dispatch, Command, EditKey, EditSession, EditStep, GotoPrompt, Key, KeyMod,
    NavContext, Outcome, PromptStep, SaveChoice, ScreenLayout, PROMPT_HEIGHT,
};
use crate::buffer::{FileView, Side, ViewPair};
use crate::ui::{EditCursor, GotoBox, HelpBar, HelpKind, HexView};

/// 入力モード
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    /// 位置入力中
    Goto(GotoPrompt),
    /// バイト編集中
    Edit(EditSession),
    /// 編集終了時の保存確認
    ConfirmSave(EditSession),
}

impl Mode {
    fn is_editing(&self) -> bool {
        matches!(self, Mode::Edit(_) | Mode::ConfirmSave(_))
    }
}

/// アプリケーション状態
pub struct App {
    pair: ViewPair,
    ctx: NavContext,
    layout: ScreenLayout,
    mode: Mode,
    /// ステータスメッセージ（次のキー入力で消える）
    status_message: Option<String>,
    should_quit: bool,
    /// 編集中に届いたリサイズ（編集終了後に反映）
    pending_resize: Option<ScreenLayout>,
}

impl App {
    pub fn new(pair: ViewPair, layout: ScreenLayout) -> Self {
        Self {
            pair,
            ctx: NavContext::default(),
            layout,
            mode: Mode::Normal,
            status_message: None,
            should_quit: false,
            pending_resize: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn pair(&self) -> &ViewPair {
        &self.pair
    }

    pub fn context(&self) -> &NavContext {
        &self.ctx
    }

    pub fn layout(&self) -> ScreenLayout {
        self.layout
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// イベントを処理（入力があるまで待つ）
    pub fn handle_event(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if let Some((key, mods)) = Key::from_event(&key) {
                    self.handle_key(key, mods)?;
                }
            }
            Event::Resize(cols, rows) => self.resize(cols, rows)?,
            _ => {}
        }
        Ok(())
    }

    /// 端末サイズの変更
    ///
    /// 画面が小さすぎる場合は `LayoutError` を返す。
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        let layout = ScreenLayout::compute(cols, rows, self.pair.is_single())?;
        if self.mode.is_editing() {
            debug!(cols, rows, "resize deferred until edit ends");
            self.pending_resize = Some(layout);
        } else {
            self.apply_layout(layout);
        }
        Ok(())
    }

    fn apply_layout(&mut self, layout: ScreenLayout) {
        if layout.num_lines != self.layout.num_lines {
            info!(num_lines = layout.num_lines, "reallocating views");
            self.pair.resize(layout.num_lines);
        }
        self.layout = layout;
    }

    /// キー入力を処理
    ///
    /// 保存に失敗した場合のみエラーを返す。
    pub fn handle_key(&mut self, key: Key, mods: KeyMod) -> Result<()> {
        self.status_message = None;

        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(key, mods),
            Mode::Goto(prompt) => self.handle_goto_key(prompt, key),
            Mode::Edit(session) => self.handle_edit_key(session, key),
            Mode::ConfirmSave(session) => {
                let choice = match key {
                    Key::Char('y') | Key::Char('Y') => SaveChoice::Save,
                    _ => SaveChoice::Discard,
                };
                let side = session.side();
                session.finish(choice, self.pair.view_mut(side))?;
                if choice == SaveChoice::Discard {
                    self.status_message = Some("Changes discarded".to_string());
                }
                self.end_edit();
                Mode::Normal
            }
        };
        Ok(())
    }

    fn handle_normal_key(&mut self, key: Key, mods: KeyMod) -> Mode {
        let cmd = Command::from_key(key, mods, self.pair.is_single());
        match dispatch(cmd, &mut self.pair, &mut self.ctx) {
            Outcome::Continue => Mode::Normal,
            Outcome::Quit => {
                self.should_quit = true;
                Mode::Normal
            }
            Outcome::Goto(targets) => Mode::Goto(GotoPrompt::new(targets)),
            Outcome::Edit(side) => self.begin_edit(side),
        }
    }

    fn begin_edit(&mut self, side: Side) -> Mode {
        match EditSession::begin(side, self.pair.view_mut(side), self.ctx.encoding) {
            Some(session) => {
                if session.is_read_only() {
                    self.status_message =
                        Some("File is read-only; changes cannot be saved".to_string());
                }
                Mode::Edit(session)
            }
            None => {
                self.status_message = Some("Nothing to edit here".to_string());
                Mode::Normal
            }
        }
    }

    fn handle_goto_key(&mut self, mut prompt: GotoPrompt, key: Key) -> Mode {
        match prompt.handle_key(key) {
            PromptStep::Pending => Mode::Goto(prompt),
            PromptStep::Cancelled => Mode::Normal,
            PromptStep::Confirmed(offset) => {
                debug!(offset, "goto");
                apply_goto(&mut self.pair, prompt.targets(), offset);
                Mode::Normal
            }
        }
    }

    fn handle_edit_key(&mut self, mut session: EditSession, key: Key) -> Mode {
        let Some(edit_key) = EditKey::from_key(key) else {
            return Mode::Edit(session);
        };

        let (target, peer) = self.pair.edit_target(session.side());
        let step = session.handle_key(edit_key, target, peer);
        self.pair.compute();

        match step {
            EditStep::Continue => Mode::Edit(session),
            EditStep::ConfirmSave => Mode::ConfirmSave(session),
            EditStep::Finished => {
                self.end_edit();
                Mode::Normal
            }
            EditStep::DiscardedReadOnly => {
                self.status_message =
                    Some("File is read-only; changes discarded".to_string());
                self.end_edit();
                Mode::Normal
            }
        }
    }

    fn end_edit(&mut self) {
        self.pair.refresh();
        if let Some(layout) = self.pending_resize.take() {
            self.apply_layout(layout);
        }
    }

    /// ペインとプロンプトの領域
    fn areas(&self, area: Rect) -> (Rect, Option<Rect>, Rect) {
        let pane = Constraint::Length(self.layout.pane_height());
        let prompt = Constraint::Length(PROMPT_HEIGHT);
        if self.pair.is_single() {
            let chunks = Layout::vertical([pane, Constraint::Min(0), prompt]).split(area);
            (chunks[0], None, chunks[2])
        } else {
            let chunks = Layout::vertical([
                pane,
                Constraint::Length(self.layout.lines_between),
                pane,
                Constraint::Min(0),
                prompt,
            ])
            .split(area);
            (chunks[0], Some(chunks[2]), chunks[4])
        }
    }

    fn title(view: &FileView, editing: bool) -> String {
        let name = view
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if editing {
            format!("{} [edit]", name)
        } else {
            name
        }
    }

    /// UIを描画
    pub fn draw(&self, frame: &mut Frame) {
        let (top_area, bottom_area, prompt_area) = self.areas(frame.area());
        let editing_side = match &self.mode {
            Mode::Edit(session) | Mode::ConfirmSave(session) => Some(session.side()),
            _ => None,
        };

        let panes = [(Side::Top, Some(top_area)), (Side::Bottom, bottom_area)];
        for (side, area) in panes {
            let Some(area) = area else { continue };
            let view = self.pair.view(side);
            let title = Self::title(view, editing_side == Some(side));
            let hex_view = HexView::new(view.window())
                .offset(view.offset())
                .num_lines(view.num_lines())
                .title(&title)
                .diffs(self.pair.diff_mask())
                .encoding(self.ctx.encoding);
            frame.render_widget(hex_view, area);
        }

        let kind = match &self.mode {
            Mode::Normal | Mode::Goto(_) => HelpKind::Normal,
            Mode::Edit(session) => HelpKind::Edit {
                mode: session.mode(),
                read_only: session.is_read_only(),
            },
            Mode::ConfirmSave(_) => HelpKind::ConfirmSave,
        };
        let help = HelpBar::new(kind)
            .encoding(self.ctx.encoding)
            .lock(self.ctx.lock)
            .single(self.pair.is_single())
            .status(self.status_message());
        frame.render_widget(help, prompt_area);

        match &self.mode {
            Mode::Goto(prompt) => {
                let area = GotoBox::area(frame.area());
                let goto = GotoBox::new(prompt.input());
                frame.set_cursor_position(goto.cursor_position(area));
                frame.render_widget(goto, area);
            }
            Mode::Edit(session) => {
                let area = match session.side() {
                    Side::Top => Some(top_area),
                    Side::Bottom => bottom_area,
                };
                if let Some(area) = area {
                    let (x, y) = session.cursor();
                    let cursor = EditCursor {
                        x,
                        y,
                        high_nibble: session.high_nibble(),
                        mode: session.mode(),
                    };
                    frame.set_cursor_position(cursor.position(area));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LockState;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const PLAIN: KeyMod = KeyMod {
        ctrl: false,
        shift: false,
        alt: false,
    };

    fn temp_file(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn app_for(a: &NamedTempFile, b: Option<&NamedTempFile>) -> App {
        let layout = ScreenLayout::compute(80, 25, b.is_none()).unwrap();
        let pair = ViewPair::open(
            a.path(),
            b.map(|f| f.path().to_path_buf()),
            layout.num_lines,
        )
        .unwrap();
        App::new(pair, layout)
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(Key::Char(c), PLAIN).unwrap();
        }
    }

    #[test]
    fn goto_moves_both_views() {
        let a = temp_file(&[0u8; 512]);
        let b = temp_file(&[0u8; 512]);
        let mut app = app_for(&a, Some(&b));

        press(&mut app, "g");
        assert!(matches!(app.mode(), Mode::Goto(_)));
        press(&mut app, "100");
        app.handle_key(Key::Enter, PLAIN).unwrap();

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.pair().top().offset(), 0x100);
        assert_eq!(app.pair().bottom().offset(), 0x100);
    }

    #[test]
    fn lock_keys_toggle() {
        let a = temp_file(&[0u8; 64]);
        let b = temp_file(&[0u8; 64]);
        let mut app = app_for(&a, Some(&b));

        press(&mut app, "t");
        assert_eq!(app.context().lock, LockState::BottomLocked);
        press(&mut app, "t");
        assert_eq!(app.context().lock, LockState::None);
        press(&mut app, "b");
        assert_eq!(app.context().lock, LockState::TopLocked);
    }

    #[test]
    fn edit_then_save_writes_file() {
        let a = temp_file(&[0x00, 0x11, 0x22]);
        let b = temp_file(&[0x00, 0x11, 0x22]);
        let mut app = app_for(&a, Some(&b));

        press(&mut app, "e");
        assert!(matches!(app.mode(), Mode::Edit(_)));
        press(&mut app, "ff");
        assert!(app.pair().diff_mask().unwrap()[0]);

        app.handle_key(Key::Escape, PLAIN).unwrap();
        assert!(matches!(app.mode(), Mode::ConfirmSave(_)));
        press(&mut app, "y");

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(std::fs::read(a.path()).unwrap(), vec![0xFF, 0x11, 0x22]);
    }

    #[test]
    fn edit_then_discard_restores_view() {
        let a = temp_file(&[0x00, 0x11, 0x22]);
        let mut app = app_for(&a, None);

        press(&mut app, "e");
        press(&mut app, "ab");
        app.handle_key(Key::Escape, PLAIN).unwrap();
        press(&mut app, "n");

        assert_eq!(app.pair().top().window(), &[0x00, 0x11, 0x22]);
        assert_eq!(std::fs::read(a.path()).unwrap(), vec![0x00, 0x11, 0x22]);
        assert_eq!(app.status_message(), Some("Changes discarded"));
    }

    #[test]
    fn resize_is_deferred_during_edit() {
        let a = temp_file(&[0u8; 64]);
        let mut app = app_for(&a, None);
        let before = app.layout();

        press(&mut app, "e");
        app.resize(80, 10).unwrap();
        assert_eq!(app.layout(), before);

        app.handle_key(Key::Escape, PLAIN).unwrap();
        assert_eq!(app.layout().num_lines, 5);
        assert_eq!(app.pair().top().num_lines(), 5);
    }

    #[test]
    fn resize_too_small_is_an_error() {
        let a = temp_file(&[0u8; 16]);
        let mut app = app_for(&a, None);
        let err = app.resize(40, 25).unwrap_err();
        assert!(err.downcast_ref::<crate::app::LayoutError>().is_some());
    }

    #[test]
    fn quit_sets_flag() {
        let a = temp_file(&[0u8; 16]);
        let mut app = app_for(&a, None);
        press(&mut app, "q");
        assert!(app.should_quit());
    }
}
