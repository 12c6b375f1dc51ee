//! Bridge between the egui thread and the storage-backed backend worker.

pub mod commands;
pub mod runtime;
