//! CLI command implementations

pub(crate) mod common;
pub(crate) mod compare;
pub(crate) mod export;
pub(crate) mod serve;
pub(crate) mod show;
