// nano-banana-editor - Natural-language photo editing backed by Gemini
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod server;
pub mod session;
pub mod utils;
