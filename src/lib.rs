//! Layout engine for two-column (before/after) Sankey diagrams.
//!
//! Paired observations are aggregated into a transition matrix, each label
//! gets a stacked band sized by its count, and every nonzero transition
//! becomes a smoothed ribbon between the two columns. Drawing is left to the
//! caller; see [`layout::DiagramGeometry`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{SankeyConfig, load_config};
pub use error::{Error, Result};
pub use ir::{Label, Observations};
pub use layout::{
    DiagramGeometry, LayoutOptions, compute_layout, compute_layout_with_colors,
    layout_observations,
};
pub use layout_dump::{LayoutDump, to_json_string, write_layout_dump};
pub use parser::{ParseOutput, parse_pairs};
pub use theme::{ColorMap, ColorSource, Palette};
