//! Operator version service
//!
//! Resolves which single version of each component (database engine,
//! backup tool, proxy, monitoring agent, ...) an operator release should
//! deploy, given an apply policy and the version a client currently runs.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod rules;
pub mod service;
pub mod version;
