//! The integration catalog: raw definitions, allow-list selectors, the resolved tool
//! list and its binary snapshot.

pub mod artifact;
pub mod definition;
pub mod resolver;
pub mod selector;

pub use artifact::CatalogSnapshot;
pub use definition::{IntegrationDefinition, PropertyDefinition};
pub use resolver::{
    DEFAULT_NAME, IntegrationEntry, IntegrationSummary, NodeMeta, NodeType, ToolCatalog,
    search_integration,
};
pub use selector::ToolSelector;
