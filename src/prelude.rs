//! Prelude module for convenient imports
//!
//! Re-exports the types most sessions need: the catalog, the configuration, the
//! dispatcher, the program and the status taxonomy.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//!
//! # fn run() -> Result<()> {
//! let config = AgentConfig::from_file("agent.yaml")?;
//! let catalog = ToolCatalog::from_config(&config)?;
//! let meta = catalog.lookup("slack", "message", "post")?;
//! for line in catalog.compile_shape(meta).values().flat_map(|node| node.describe("0", 2, 1)) {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

// Catalog and compilation
pub use crate::catalog::{NodeMeta, NodeType, ToolCatalog};
pub use crate::compiler::SchemaCompiler;
pub use crate::config::{AgentConfig, Environment};

// Parameter trees
pub use crate::parameter::{ParamError, ParameterKind, ParameterNode, ParameterTree, ParameterType};

// Session state and dispatch
pub use crate::dispatch::{ActionRecord, ToolDispatcher};
pub use crate::workflow::{NodeInstance, Program};

// Status and error types
pub use crate::error::{CatalogError, ConfigError, LookupError, SnapshotError};
pub use crate::status::{ToolCallOutcome, ToolCallStatus};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
