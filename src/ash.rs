//! Main module for ashdsl library functionality

pub mod ast;
pub mod config;
pub mod declarations;
pub mod extraction;
pub mod formats;
pub mod grammar;
pub mod names;
pub mod parsers;
pub mod settings;
pub mod testing;
