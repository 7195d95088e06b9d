use std::fmt;

/// The bracketed location of a parameter, e.g. `params["blocksUi"][0]["text"]`.
///
/// Nodes do not know their parents. Every recursive operation threads one of these
/// down the tree instead, extending it one segment per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath {
    rendered: String,
    depth: usize,
}

impl ParamPath {
    /// Path of a top-level parameter. Roots sit at depth 1.
    pub fn root(name: &str) -> Self {
        Self {
            rendered: format!("params[\"{}\"]", name),
            depth: 1,
        }
    }

    /// Path of a named member under this one. Members of a multi-valued collection
    /// are addressed through its first item.
    pub fn member(&self, name: &str, through_list: bool) -> Self {
        let rendered = if through_list {
            format!("{}[0][\"{}\"]", self.rendered, name)
        } else {
            format!("{}[\"{}\"]", self.rendered, name)
        };
        Self {
            rendered,
            depth: self.depth + 1,
        }
    }

    /// Path of the `value` slot of a resource locator when `mode` is selected.
    pub fn mode(&self, mode: &str) -> Self {
        Self {
            rendered: format!("{}[\"value\"](when \"mode\"=\"{}\")", self.rendered, mode),
            depth: self.depth + 1,
        }
    }

    /// The same path with a list index appended, used when naming one item of a list input.
    pub fn indexed(&self, index: usize) -> String {
        format!("{}[{}]", self.rendered, index)
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
