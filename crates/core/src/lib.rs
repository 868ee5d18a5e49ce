#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod element;
pub mod grammar;
pub mod manifest;
