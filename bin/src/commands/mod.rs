//! CLI command implementations.

pub(crate) mod reset_db;
pub(crate) mod run;
pub(crate) mod status;
