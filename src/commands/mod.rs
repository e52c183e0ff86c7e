//! CLI commands for claimscore

pub mod dispatch;
pub mod history;
pub mod render;
pub mod run;
pub mod show;
