//! End-to-end behavior of the views, navigation and editing through the
//! public API, using real files on disk.

use std::io::Write as _;

use bindiff::app::{
    apply_goto, dispatch, App, Command, Direction, EditKey, EditSession, EditStep, Key, KeyMod,
    MoveUnit, NavContext, SaveChoice, ScreenLayout, Targets,
};
use bindiff::buffer::{DiffResult, FileView, Side, ViewPair};
use bindiff::encoding::CharEncoding;
use tempfile::NamedTempFile;

fn temp_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

fn open_pair(a: &NamedTempFile, b: Option<&NamedTempFile>, num_lines: usize) -> ViewPair {
    ViewPair::open(a.path(), b.map(|f| f.path().to_path_buf()), num_lines).unwrap()
}

#[test]
fn single_byte_difference_is_found() {
    let a = temp_file(&[0u8; 32]);
    let mut data = [0u8; 32];
    data[5] = 0xFF;
    let b = temp_file(&data);

    let pair = open_pair(&a, Some(&b), 2);
    assert_eq!(pair.diff_result(), DiffResult::Count(1));
    let mask = pair.diff_mask().unwrap();
    for (i, &marked) in mask.iter().enumerate() {
        assert_eq!(marked, i == 5, "index {i}");
    }
}

#[test]
fn shorter_file_marks_the_tail() {
    let a = temp_file(&[7u8; 10]);
    let b = temp_file(&[7u8; 16]);

    let pair = open_pair(&a, Some(&b), 1);
    assert_eq!(pair.diff_result(), DiffResult::Count(6));
    let mask = pair.diff_mask().unwrap();
    assert!(mask[..10].iter().all(|&m| !m));
    assert!(mask[10..16].iter().all(|&m| m));
}

#[test]
fn empty_single_file_never_advances() {
    let a = temp_file(&[]);
    let mut pair = open_pair(&a, None, 4);
    let mut ctx = NavContext::default();
    assert!(pair.diff_result().is_no_data());

    for unit in [MoveUnit::Line, MoveUnit::Page, MoveUnit::All] {
        let cmd = Command::Move {
            unit,
            direction: Direction::Forward,
            targets: Targets::BOTH,
        };
        dispatch(cmd, &mut pair, &mut ctx);
        assert_eq!(pair.top().offset(), 0);
    }
    dispatch(Command::NextDifference, &mut pair, &mut ctx);
    assert_eq!(pair.top().offset(), 0);
}

#[test]
fn hex_then_text_edit_is_committed() {
    let a = temp_file(&[0x3A, 0x00]);
    let mut view = FileView::open(a.path(), 2).unwrap();
    let mut session = EditSession::begin(Side::Top, &mut view, CharEncoding::Ascii).unwrap();

    for key in [
        EditKey::Input('5'),
        EditKey::Input('B'),
        EditKey::ToggleMode,
        EditKey::Input('k'),
    ] {
        assert_eq!(session.handle_key(key, &mut view, None), EditStep::Continue);
    }
    assert_eq!(view.window(), &[0x5B, b'k']);
    assert_eq!(
        session.handle_key(EditKey::Done, &mut view, None),
        EditStep::ConfirmSave
    );
    session.finish(SaveChoice::Save, &mut view).unwrap();

    let fresh = FileView::open(a.path(), 2).unwrap();
    assert_eq!(fresh.window(), &[0x5B, b'k']);
}

#[test]
fn discarded_edit_matches_fresh_load() {
    let original: Vec<u8> = (0u8..40).collect();
    let a = temp_file(&original);
    let mut view = FileView::open(a.path(), 4).unwrap();
    view.load(16);
    let mut session = EditSession::begin(Side::Top, &mut view, CharEncoding::Ascii).unwrap();

    for key in [EditKey::Input('f'), EditKey::Input('f'), EditKey::Down, EditKey::Input('0')] {
        session.handle_key(key, &mut view, None);
    }
    session.handle_key(EditKey::Done, &mut view, None);
    session.finish(SaveChoice::Discard, &mut view).unwrap();

    let mut fresh = FileView::open(a.path(), 4).unwrap();
    fresh.load(16);
    assert_eq!(view.window(), fresh.window());
    assert_eq!(std::fs::read(a.path()).unwrap(), original);
}

#[test]
fn locked_side_stays_put_during_goto() {
    let a = temp_file(&[0u8; 256]);
    let b = temp_file(&[0u8; 256]);
    let mut pair = open_pair(&a, Some(&b), 2);
    let mut ctx = NavContext::default();

    // 上だけ動かす
    dispatch(Command::ToggleTopLock, &mut pair, &mut ctx);
    let outcome = dispatch(Command::Goto(Targets::BOTH), &mut pair, &mut ctx);
    let bindiff::app::Outcome::Goto(targets) = outcome else {
        panic!("expected goto, got {outcome:?}");
    };
    assert_eq!(targets, Targets::TOP);

    apply_goto(&mut pair, targets, 0x80);
    assert_eq!(pair.top().offset(), 0x80);
    assert_eq!(pair.bottom().offset(), 0);
}

#[test]
fn app_finds_next_difference_and_edits_bottom() {
    let a = temp_file(&[0u8; 256]);
    let mut data = [0u8; 256];
    data[200] = 1;
    let b = temp_file(&data);

    let layout = ScreenLayout::compute(80, 12, false).unwrap();
    let pair = open_pair(&a, Some(&b), layout.num_lines);
    let mut app = App::new(pair, layout);
    let plain = KeyMod::default();
    let alt = KeyMod {
        alt: true,
        ..KeyMod::default()
    };

    app.handle_key(Key::Enter, plain).unwrap();
    let capacity = app.pair().capacity() as u64;
    let expected = 200 / capacity * capacity;
    assert_eq!(app.pair().top().offset(), expected);
    assert!(app.pair().diff_result().has_differences());

    // 下のファイルを上と同じ値に戻す
    app.handle_key(Key::Char('e'), alt).unwrap();
    let index = (200 - expected) as usize;
    for _ in 0..index {
        app.handle_key(Key::Right, plain).unwrap();
        app.handle_key(Key::Right, plain).unwrap();
    }
    app.handle_key(Key::Enter, plain).unwrap();
    assert_eq!(app.pair().diff_result(), DiffResult::Count(0));

    app.handle_key(Key::Escape, plain).unwrap();
    app.handle_key(Key::Char('y'), plain).unwrap();
    assert_eq!(std::fs::read(b.path()).unwrap(), vec![0u8; 256]);
}
