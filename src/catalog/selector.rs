use crate::error::CatalogError;
use std::fmt;
use std::str::FromStr;

/// One allow-list entry: `integration`, `integration.resource` or
/// `integration.resource.operation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolSelector {
    pub integration: String,
    pub resource: Option<String>,
    pub operation: Option<String>,
}

impl ToolSelector {
    /// Whether the selector admits the given resource/operation pair of its integration.
    pub fn admits(&self, resource: &str, operation: &str) -> bool {
        let resource_ok = self.resource.as_deref().is_none_or(|r| r == resource);
        let operation_ok = self.operation.as_deref().is_none_or(|o| o == operation);
        resource_ok && operation_ok
    }

    pub fn is_whole_integration(&self) -> bool {
        self.resource.is_none()
    }
}

impl FromStr for ToolSelector {
    type Err = CatalogError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = entry.trim().split('.').collect();
        if segments.len() > 3 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(CatalogError::InvalidSelector(entry.to_string()));
        }
        Ok(ToolSelector {
            integration: segments[0].to_string(),
            resource: segments.get(1).map(|s| s.to_string()),
            operation: segments.get(2).map(|s| s.to_string()),
        })
    }
}

impl fmt::Display for ToolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.integration)?;
        if let Some(resource) = &self.resource {
            write!(f, ".{}", resource)?;
        }
        if let Some(operation) = &self.operation {
            write!(f, ".{}", operation)?;
        }
        Ok(())
    }
}
