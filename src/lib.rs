//! codereview - LLM-backed code review
//!
//! Sends source files to a Gemini model, extracts structured issues from the
//! reply and serves the results, plus follow-up chat, over HTTP.

pub mod cli;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod model;
pub mod review;
pub mod server;
pub mod store;
