use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{cell_index, BufferError, LINE_WIDTH};

/// ファイルの一部（ウィンドウ）を保持するビュー
///
/// `data` は常に `capacity` バイト確保されており、そのうち先頭の
/// `contents` バイトだけが意味のあるデータになる。
pub struct FileView {
    /// ファイルパス（未割り当てのビューは None）
    path: Option<PathBuf>,
    /// ファイルハンドル
    file: Option<File>,
    /// 書き込み可能で開き直したかどうか
    writable: bool,
    /// data[0] のファイル上の位置
    offset: u64,
    /// ウィンドウのバイト列
    data: Vec<u8>,
    /// 有効なバイト数
    contents: usize,
    /// 表示行数
    num_lines: usize,
}

impl FileView {
    /// ファイルに結び付かないビューを作成（単一ファイルモードの下側）
    pub fn unbound(num_lines: usize) -> Self {
        Self {
            path: None,
            file: None,
            writable: false,
            offset: 0,
            data: vec![0; num_lines * LINE_WIDTH],
            contents: 0,
            num_lines,
        }
    }

    /// 読み取り専用でファイルを開き、先頭のウィンドウを読み込む
    pub fn open(path: impl Into<PathBuf>, num_lines: usize) -> Result<Self, BufferError> {
        let path = path.into();
        let file = File::open(&path).map_err(|source| BufferError::Open {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "opened file");

        let mut view = Self::unbound(num_lines);
        view.path = Some(path);
        view.file = Some(file);
        view.load(0);
        Ok(view)
    }

    /// ファイルパスを取得
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// ファイルに結び付いているかどうか
    pub fn is_bound(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn contents(&self) -> usize {
        self.contents
    }

    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 1ページ分の移動量（最後の1行を残す）
    pub fn page_step(&self) -> usize {
        self.capacity().saturating_sub(LINE_WIDTH)
    }

    /// 現在のウィンドウの有効部分（読み取り専用）
    pub fn window(&self) -> &[u8] {
        &self.data[..self.contents]
    }

    /// 指定セルのバイトを取得（データ末尾より後ろは 0）
    pub fn byte_at(&self, x: usize, y: usize) -> u8 {
        let index = cell_index(y, x);
        if index < self.contents {
            self.data[index]
        } else {
            0
        }
    }

    /// 指定オフセットからウィンドウを読み込む
    ///
    /// 負のオフセットは 0 に丸める。ファイル末尾付近では `contents` が
    /// 容量より小さくなるが、これはエラーではない。
    pub fn load(&mut self, offset: i64) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        self.offset = offset.max(0) as u64;
        self.contents = match read_window(file, self.offset, &mut self.data) {
            Ok(n) => n,
            Err(e) => {
                warn!(offset = self.offset, error = %e, "read failed, showing empty window");
                0
            }
        };
    }

    /// 現在位置を再読み込み（編集内容を破棄）
    pub fn reload(&mut self) {
        self.load(self.offset as i64);
    }

    /// 相対移動
    pub fn move_by(&mut self, delta: i64) {
        self.load(self.offset as i64 + delta);
    }

    /// ファイル末尾へ移動
    ///
    /// `peer` が与えられた場合は短い方のファイルの末尾に両方を合わせる。
    /// 結果のオフセットは常に `LINE_WIDTH` の倍数になる。
    pub fn move_to_end(&mut self, peer: Option<&mut FileView>) {
        if self.file.is_none() {
            return;
        }

        let mut end = self.file_len();
        if let Some(ref peer) = peer {
            end = end.min(peer.file_len());
        }

        let end = (end as i64 - self.page_step() as i64).max(0);
        let end = end - end % LINE_WIDTH as i64;

        self.load(end);
        if let Some(peer) = peer {
            peer.load(end);
        }
    }

    /// ファイルサイズ（取得できなければ 0）
    pub(crate) fn file_len(&self) -> u64 {
        match self.file.as_ref().map(File::metadata) {
            Some(Ok(meta)) => meta.len(),
            Some(Err(e)) => {
                warn!(error = %e, "cannot stat file");
                0
            }
            None => 0,
        }
    }

    /// 読み書き可能で開き直す（一度成功したら読み取り専用には戻さない）
    pub fn promote_to_writable(&mut self) -> Result<(), BufferError> {
        if self.writable {
            return Ok(());
        }
        let path = self.path.clone().ok_or(BufferError::Unbound)?;

        match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => {
                self.file = Some(file);
                self.writable = true;
                info!(path = %path.display(), "reopened read-write");
                Ok(())
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "cannot open for writing");
                Err(BufferError::ReadOnly { path, source })
            }
        }
    }

    /// 編集内容をファイルに書き戻す（`contents` バイトちょうど）
    pub fn commit_edits(&mut self) -> Result<(), BufferError> {
        self.promote_to_writable()?;
        let path = self.path.clone().ok_or(BufferError::Unbound)?;
        let file = self.file.as_mut().ok_or(BufferError::Unbound)?;

        write_window(file, self.offset, &self.data[..self.contents])
            .map_err(|source| BufferError::Write { path, source })?;

        info!(offset = self.offset, len = self.contents, "committed edits");
        Ok(())
    }

    /// `contents` を最低 `len` まで伸ばし、間を 0 で埋める
    pub fn extend_to(&mut self, len: usize) {
        let len = len.min(self.capacity());
        if len > self.contents {
            self.data[self.contents..len].fill(0);
            self.contents = len;
        }
    }

    /// 指定セルにバイトを書き込む（データ末尾より後ろなら先に伸ばす）
    pub fn set_byte(&mut self, x: usize, y: usize, value: u8) {
        let index = cell_index(y, x);
        if index >= self.capacity() {
            return;
        }
        self.extend_to(index + 1);
        self.data[index] = value;
    }

    /// 表示行数の変更に合わせてバッファを確保し直す
    pub fn resize(&mut self, num_lines: usize) {
        debug!(num_lines, "resizing view");
        self.num_lines = num_lines;
        self.data = vec![0; num_lines * LINE_WIDTH];
        self.contents = 0;
        self.reload();
    }
}

/// `offset` から `buf` が埋まるかEOFまで読み込む
fn read_window(file: &mut File, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
    file.seek(SeekFrom::Start(offset))?;
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn write_window(file: &mut File, offset: u64, data: &[u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(data)?;
    file.flush()
}
