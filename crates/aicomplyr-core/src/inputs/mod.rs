//! Rows read from the project, tool-usage and policy stores.

pub mod model;
pub mod policy;
