//! gvm installs toolchains for several languages side by side under one base
//! directory and prints the shell statement that switches between them.

pub mod archive;
pub mod commands;
pub mod config;
pub mod download;
pub mod logging;
pub mod remote;
pub mod shell;
pub mod source;
pub mod store;
