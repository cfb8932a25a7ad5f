//! # survey-query
//!
//! Weighted natural-language querying over household survey microdata.
//!
//! Questions such as "¿Cuál es el ingreso promedio anual por nivel
//! socioeconómico?" are classified by statistical intent and rewritten so
//! that whatever answers them (a SQL-generating agent, a hosted agent
//! executor, a bare language model) applies the survey expansion factor.
//!
//! ## Quick Start
//!
//! ```rust
//! use survey_query::rewriter::{rewrite, DEFAULT_WEIGHT_COLUMN};
//!
//! let instruction = rewrite(
//!     "¿Cuál es el ingreso promedio anual por nivel socioeconómico?",
//!     DEFAULT_WEIGHT_COLUMN,
//! );
//! assert!(instruction.contains("SUM(variable * Factor_expasion) / SUM(Factor_expasion) * 12"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod agent;
pub mod cli;
pub mod config;
pub mod data;
pub mod llm;
pub mod rewriter;
pub mod session;
pub mod utils;

pub use crate::agent::{AgentResponse, QueryAgent};
pub use crate::cli::Cli;
pub use crate::config::AppConfig;
pub use crate::rewriter::{rewrite, Intent, RewriteOptions, WeightedQueryRewriter};
pub use crate::session::{Exchange, History, Session};

/// The current version of survey-query.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
