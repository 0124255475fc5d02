pub mod approve;
pub mod cleanup;
pub mod datasets;
pub mod reset;
pub mod schedule;
