#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

pub use config::{LayoutConfig, load_config};
pub use error::SungearError;
pub use ir::{ListSet, SetRegistry};
pub use layout::{Layout, SolverOutcome, compute_layout};
pub use parser::{parse_filter, parse_lists};

#[cfg(feature = "cli")]
pub use cli::run;
