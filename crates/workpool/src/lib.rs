#![doc = include_str!("../README.md")]

mod config;
mod error;
mod item;
pub mod pipeline;
pub mod pool;
mod stats;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::item::*;
pub use crate::pool::WorkerPool;
pub use crate::stats::*;
