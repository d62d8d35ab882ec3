pub mod config;
pub mod context;
pub mod error;
pub mod frontmatter;
pub mod gate;
pub mod io;
pub mod paths;
pub mod plan;
pub mod prereqs;
pub mod resolver;
pub mod rules;
pub mod skip;
pub mod snapshot;
pub mod step;
pub mod types;

pub use error::{GsdError, Result};
