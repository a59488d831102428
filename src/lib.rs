//! clipsync: command line front end and bootstrap for the clipboard sync
//! engine.

pub mod bootstrap;
pub mod cli;
pub mod commands;
