#![allow(clippy::needless_return)]
#![allow(clippy::new_without_default)]

pub mod config;
pub mod dialect;
pub mod interop;
pub mod logging;
pub mod range_parser;
pub mod services;
pub mod workspace;
