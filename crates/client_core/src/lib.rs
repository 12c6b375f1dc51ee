pub mod config;
mod nickname_controller;

pub use nickname_controller::{
    LoadPhase, NicknameController, NicknameSnapshot, RemoveOutcome, SaveOutcome,
};
