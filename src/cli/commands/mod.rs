//! Command implementations

pub mod calc;
pub mod completions;
pub mod export;
pub mod init;
pub mod item;
pub mod list;
pub mod new;
pub mod schedule;
pub mod set;
pub mod tax;
pub mod utils;
pub mod validate;
