mod diff;
mod file_view;
mod pair;

pub use diff::{diff_windows, DiffEngine, DiffResult};
pub use file_view::FileView;
pub use pair::{Side, ViewPair};

use std::path::PathBuf;

use thiserror::Error;

/// 1行あたりのバイト数
pub const LINE_WIDTH: usize = 16;

/// (行, 列) から線形インデックスへの変換
pub const fn cell_index(row: usize, col: usize) -> usize {
    row * LINE_WIDTH + col
}

/// バッファ操作のエラー
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("Unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to open {} for writing: {source}", path.display())]
    ReadOnly {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No file bound to this view")]
    Unbound,
}
