use std::fs::File;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute, queue,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, BeginSynchronizedUpdate, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bindiff::app::{App, LayoutError, ScreenLayout};
use bindiff::buffer::ViewPair;

const LICENSE: &str = "\
MIT License

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

/// Compare two binary files side by side, or view and edit a single file
#[derive(Parser, Debug)]
#[command(name = "bindiff")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First file (shown on top)
    #[arg(value_name = "FILE1", required_unless_present = "license")]
    file1: Option<PathBuf>,

    /// Second file (shown below); omit to view a single file
    #[arg(value_name = "FILE2")]
    file2: Option<PathBuf>,

    /// Print the license and exit
    #[arg(short = 'L', long)]
    license: bool,

    /// Append diagnostic logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help と --version は正常終了
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if args.license {
        println!("{}", LICENSE);
        return ExitCode::SUCCESS;
    }

    if let Some(ref path) = args.log {
        if let Err(e) = init_tracing(path) {
            eprintln!("Unable to open log file {}: {}", path.display(), e);
            return ExitCode::from(1);
        }
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "exiting");
            eprintln!("{}", e);
            if e.downcast_ref::<LayoutError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

/// ログをファイルに追記する（端末は描画に使うため）
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let Some(file1) = args.file1 else {
        return Ok(());
    };
    let single = args.file2.is_none();

    // 画面サイズの確認は端末を切り替える前に行う
    let (cols, rows) = terminal::size()?;
    let layout = ScreenLayout::compute(cols, rows, single)?;

    let pair = ViewPair::open(&file1, args.file2.clone(), layout.num_lines)?;
    info!(
        file1 = %file1.display(),
        file2 = ?args.file2,
        num_lines = layout.num_lines,
        "starting"
    );
    let mut app = App::new(pair, layout);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &file1);

    // ターミナルの後処理（エラー時も必ず戻す）
    let restored = restore_terminal(&mut terminal);
    first_error(result, restored)
}

/// 実行中のエラーを優先し、後処理の失敗はログに残すだけにする
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(e), Err(restore)) => {
            warn!(error = %restore, "failed to restore terminal");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw?;
    screen?;
    cursor?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    file1: &Path,
) -> Result<()> {
    let title = format!("bindiff - {}", file1.display());
    execute!(terminal.backend_mut(), SetTitle(&title))?;

    loop {
        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|f| app.draw(f))?;
        queue!(terminal.backend_mut(), EndSynchronizedUpdate)?;
        terminal.backend_mut().flush()?;

        app.handle_event()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
