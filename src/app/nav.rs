use tracing::debug;

use super::{Command, Direction, MoveUnit, Targets};
use crate::buffer::{Side, ViewPair, LINE_WIDTH};
use crate::encoding::CharEncoding;

/// ロック状態（ロックされた側は移動しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    None,
    TopLocked,
    BottomLocked,
}

impl LockState {
    pub fn is_locked(self, side: Side) -> bool {
        matches!(
            (self, side),
            (LockState::TopLocked, Side::Top) | (LockState::BottomLocked, Side::Bottom)
        )
    }

    /// ロックされた側を対象から外す
    pub fn restrict(self, targets: Targets) -> Targets {
        Targets {
            top: targets.top && !self.is_locked(Side::Top),
            bottom: targets.bottom && !self.is_locked(Side::Bottom),
        }
    }
}

/// ナビゲーションの状態（ロックと文字セット）
#[derive(Debug, Clone, Copy, Default)]
pub struct NavContext {
    pub lock: LockState,
    pub encoding: CharEncoding,
}

impl NavContext {
    /// 汎用の編集コマンドが対象にする側
    pub fn active_side(&self) -> Side {
        if self.lock == LockState::TopLocked {
            Side::Bottom
        } else {
            Side::Top
        }
    }
}

/// コマンド実行の結果、呼び出し側がすべきこと
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// 位置入力ダイアログを開く
    Goto(Targets),
    /// 編集セッションを開始する
    Edit(Side),
    Quit,
}

/// コマンドを実行し、差分を再計算する
///
/// 実行後に両方のビューが空になっていたら、表示できる位置まで戻す。
pub fn dispatch(cmd: Command, pair: &mut ViewPair, ctx: &mut NavContext) -> Outcome {
    let outcome = match cmd {
        Command::Move {
            unit,
            direction,
            targets,
        } => {
            move_views(pair, unit, direction, ctx.lock.restrict(targets));
            Outcome::Continue
        }
        Command::Goto(targets) => {
            let targets = ctx.lock.restrict(targets);
            if targets.is_empty() {
                Outcome::Continue
            } else {
                Outcome::Goto(targets)
            }
        }
        Command::NextDifference => {
            ctx.lock = LockState::None;
            next_difference(pair);
            Outcome::Continue
        }
        Command::ToggleTopLock => {
            ctx.lock = match ctx.lock {
                LockState::BottomLocked => LockState::None,
                _ => LockState::BottomLocked,
            };
            Outcome::Continue
        }
        Command::ToggleBottomLock => {
            ctx.lock = match ctx.lock {
                LockState::TopLocked => LockState::None,
                _ => LockState::TopLocked,
            };
            Outcome::Continue
        }
        Command::ToggleCharacterSet => {
            ctx.encoding = ctx.encoding.next();
            Outcome::Continue
        }
        Command::EditTop => Outcome::Edit(Side::Top),
        Command::EditBottom if pair.is_single() => Outcome::Continue,
        Command::EditBottom => Outcome::Edit(Side::Bottom),
        Command::EditActive => Outcome::Edit(ctx.active_side()),
        Command::Quit => Outcome::Quit,
        Command::None => Outcome::Continue,
    };

    pair.refresh();
    outcome
}

/// 位置入力の確定値を対象ビューに反映
pub fn apply_goto(pair: &mut ViewPair, targets: Targets, offset: u64) {
    let offset = offset.min(i64::MAX as u64) as i64;
    for side in [Side::Top, Side::Bottom] {
        if targets.includes(side) {
            pair.view_mut(side).load(offset);
        }
    }
    pair.refresh();
}

fn move_views(pair: &mut ViewPair, unit: MoveUnit, direction: Direction, targets: Targets) {
    let step = match unit {
        MoveUnit::Byte => 1,
        MoveUnit::Line => LINE_WIDTH as i64,
        MoveUnit::Page => pair.page_step() as i64,
        MoveUnit::All => 0,
    };
    let single = pair.is_single();
    let (top, bottom) = pair.both_mut();

    match (unit, direction) {
        (MoveUnit::All, Direction::Forward) => {
            if targets.top {
                let peer = (!single && targets.bottom).then_some(bottom);
                top.move_to_end(peer);
            } else if targets.bottom {
                bottom.move_to_end(None);
            }
        }
        (MoveUnit::All, Direction::Backward) => {
            if targets.top {
                top.load(0);
            }
            if targets.bottom {
                bottom.load(0);
            }
        }
        _ => {
            let step = match direction {
                Direction::Forward => step,
                Direction::Backward => -step,
            };
            if targets.top {
                top.move_by(step);
            }
            if targets.bottom {
                bottom.move_by(step);
            }
        }
    }
}

/// 差分が見つかるまで両方を1バッファ分ずつ進める
///
/// 両方ともEOFを越えたら（NoData）そこで止める。
fn next_difference(pair: &mut ViewPair) {
    let step = pair.capacity() as i64;
    let mut pages = 0usize;
    loop {
        let (top, bottom) = pair.both_mut();
        top.move_by(step);
        bottom.move_by(step);
        pages += 1;

        let result = pair.compute();
        if result.is_no_data() || result.has_differences() {
            debug!(pages, ?result, "next difference search finished");
            break;
        }
    }
}
