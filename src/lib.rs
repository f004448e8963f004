// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod specs;

pub mod file;
pub mod log;
pub mod notify;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod store;
