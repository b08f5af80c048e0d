use super::FileView;

/// 差分計算の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffResult {
    /// 両方のウィンドウが空（両方ともEOFを越えている）
    NoData,
    /// 異なるバイト数
    Count(usize),
}

impl DiffResult {
    pub fn is_no_data(self) -> bool {
        self == DiffResult::NoData
    }

    /// 差分が1つ以上あるか（NoData は含まない）
    pub fn has_differences(self) -> bool {
        matches!(self, DiffResult::Count(n) if n > 0)
    }
}

/// 2つのウィンドウをバイト単位で比較し、`mask` に差分位置を記録する
///
/// 片方にしか存在しない位置は無条件に差分として数える。
pub fn diff_windows(a: &[u8], b: &[u8], mask: &mut [bool]) -> DiffResult {
    mask.fill(false);

    let common = a.len().min(b.len());
    let longest = a.len().max(b.len());
    if longest == 0 {
        return DiffResult::NoData;
    }

    let mut count = 0;
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        if x != y {
            mask[i] = true;
            count += 1;
        }
    }

    mask[common..longest].fill(true);
    count += longest - common;

    DiffResult::Count(count)
}

/// 差分エンジン（差分マスクを保持）
pub struct DiffEngine {
    mask: Vec<bool>,
    single: bool,
    result: DiffResult,
}

impl DiffEngine {
    pub fn new(capacity: usize, single: bool) -> Self {
        Self {
            mask: vec![false; capacity],
            single,
            result: DiffResult::NoData,
        }
    }

    /// 差分を計算
    ///
    /// 単一ファイルモードでは比較を行わず、データがあれば 1 を返す。
    /// これで「差分が見つかるまで進む」ループも1回で止まる。
    pub fn compute(&mut self, top: &FileView, bottom: &FileView) -> DiffResult {
        self.result = if self.single {
            if top.contents() > 0 {
                DiffResult::Count(1)
            } else {
                DiffResult::NoData
            }
        } else {
            diff_windows(top.window(), bottom.window(), &mut self.mask)
        };
        self.result
    }

    /// 直近の計算結果
    pub fn result(&self) -> DiffResult {
        self.result
    }

    /// 差分マスク（単一ファイルモードでは None）
    pub fn mask(&self) -> Option<&[bool]> {
        (!self.single).then_some(self.mask.as_slice())
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn resize(&mut self, capacity: usize) {
        self.mask = vec![false; capacity];
    }
}
