//! UI layer for the nickname screen.

pub mod app;

pub use app::NicknameApp;
