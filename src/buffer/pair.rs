use std::path::PathBuf;

use tracing::debug;

use super::{BufferError, DiffEngine, DiffResult, FileView, LINE_WIDTH};

/// 上下どちらのビューか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

/// 上下2つのビューと差分エンジンの組
pub struct ViewPair {
    top: FileView,
    bottom: FileView,
    engine: DiffEngine,
}

impl ViewPair {
    /// ファイルを開く（`second` が None なら単一ファイルモード）
    pub fn open(
        first: impl Into<PathBuf>,
        second: Option<PathBuf>,
        num_lines: usize,
    ) -> Result<Self, BufferError> {
        let top = FileView::open(first, num_lines)?;
        let bottom = match second {
            Some(path) => FileView::open(path, num_lines)?,
            None => FileView::unbound(num_lines),
        };
        Ok(Self::from_views(top, bottom))
    }

    /// 既存のビューから組を作る（下側が未割り当てなら単一ファイルモード）
    pub fn from_views(top: FileView, bottom: FileView) -> Self {
        let single = !bottom.is_bound();
        let engine = DiffEngine::new(top.capacity(), single);
        let mut pair = Self { top, bottom, engine };
        pair.compute();
        pair
    }

    pub fn is_single(&self) -> bool {
        self.engine.is_single()
    }

    pub fn top(&self) -> &FileView {
        &self.top
    }

    pub fn bottom(&self) -> &FileView {
        &self.bottom
    }

    pub fn view(&self, side: Side) -> &FileView {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn view_mut(&mut self, side: Side) -> &mut FileView {
        match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
        }
    }

    pub fn both_mut(&mut self) -> (&mut FileView, &mut FileView) {
        (&mut self.top, &mut self.bottom)
    }

    /// 編集対象と、コピー元になる相手側ビュー
    pub fn edit_target(&mut self, side: Side) -> (&mut FileView, Option<&FileView>) {
        let single = self.is_single();
        match side {
            Side::Top => (&mut self.top, (!single).then_some(&self.bottom)),
            Side::Bottom => (&mut self.bottom, Some(&self.top)),
        }
    }

    pub fn page_step(&self) -> usize {
        self.top.page_step()
    }

    pub fn capacity(&self) -> usize {
        self.top.capacity()
    }

    pub fn diff_mask(&self) -> Option<&[bool]> {
        self.engine.mask()
    }

    pub fn diff_result(&self) -> DiffResult {
        self.engine.result()
    }

    /// 差分を再計算
    pub fn compute(&mut self) -> DiffResult {
        self.engine.compute(&self.top, &self.bottom)
    }

    /// 差分を再計算し、両方が空なら1ページずつ戻る
    ///
    /// 戻る量は最低1行。1ページずつ読み直す代わりに、ファイル長から
    /// データが見える最初の位置を求めて一度に移動する。
    /// 両方とも先頭にいて空のまま（空ファイル）ならそこで止まる。
    pub fn refresh(&mut self) -> DiffResult {
        let mut result = self.compute();
        while result.is_no_data() {
            if self.top.offset() == 0 && self.bottom.offset() == 0 {
                break;
            }
            let step = self.page_step().max(LINE_WIDTH) as u64;
            let to_start = pages_to_start(self.top.offset(), step)
                .max(pages_to_start(self.bottom.offset(), step));
            let pages = pages_to_data(&self.top, step)
                .min(pages_to_data(&self.bottom, step))
                .min(to_start)
                .max(1);
            debug!(step, pages, "both views exhausted, stepping back");

            let back = pages.saturating_mul(step);
            for view in [&mut self.top, &mut self.bottom] {
                let offset = view.offset().saturating_sub(back);
                view.load(offset as i64);
            }
            result = self.compute();
        }
        result
    }

    /// 表示行数の変更
    pub fn resize(&mut self, num_lines: usize) {
        self.top.resize(num_lines);
        self.bottom.resize(num_lines);
        self.engine.resize(self.top.capacity());
        self.refresh();
    }
}

/// 先頭まで戻るのに必要なページ数
fn pages_to_start(offset: u64, step: u64) -> u64 {
    offset.div_ceil(step)
}

/// 末尾より手前（データが見える位置）まで戻るのに必要なページ数
///
/// 空のファイルや未割り当てのビューは何ページ戻っても見えない。
fn pages_to_data(view: &FileView, step: u64) -> u64 {
    let len = view.file_len();
    if len == 0 {
        u64::MAX
    } else if view.offset() < len {
        1
    } else {
        (view.offset() - len) / step + 1
    }
}
