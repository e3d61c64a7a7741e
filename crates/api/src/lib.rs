//! HTTP webhook adapter: lets an external submission dispatcher call the
//! before-commit and after-commit stages over HTTP.

pub mod app;
pub mod settings;
