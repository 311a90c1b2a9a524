//! Preview infrastructure module

mod terminal;

pub use terminal::TerminalPreview;
