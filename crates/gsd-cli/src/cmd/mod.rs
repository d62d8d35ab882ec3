pub mod config;
pub mod context;
pub mod end_project;
pub mod next;
pub mod prereqs;
pub mod skip;
pub mod state;
