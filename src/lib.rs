//! bindiff - side-by-side binary file comparison and byte editor
//!
//! The library holds the windowed file views, the difference engine and the
//! terminal UI used by the `bindiff` binary.

pub mod app;
pub mod buffer;
pub mod encoding;
pub mod ui;
