use super::{ParamPath, ParameterKind, ParameterNode, ParameterTree, quoted_list};
use crate::catalog::definition::literal_text;

/// Children of a required composite are always expanded in full.
const REQUIRED_DEPTH: usize = 1000;

impl ParameterNode {
    /// Describes this node as a top-level parameter.
    pub fn describe(&self, prefix: &str, indent: usize, max_depth: usize) -> Vec<String> {
        self.to_description(prefix, indent, max_depth, &ParamPath::root(&self.name))
    }

    /// Renders the node as indented text lines for the model.
    ///
    /// The first line carries the path, the type, any default, the requiredness clause
    /// and the description. Composites then list their children under `{prefix}.{k}`,
    /// unless this node is optional and already `max_depth` levels deep, in which case
    /// the children collapse to a single `...hidden...` line.
    pub fn to_description(
        &self,
        prefix: &str,
        indent: usize,
        max_depth: usize,
        path: &ParamPath,
    ) -> Vec<String> {
        let pad = " ".repeat(indent);
        match &self.kind {
            ParameterKind::String { .. } => {
                vec![format!("{}{}", pad, self.scalar_line(prefix, path, "string", true))]
            }
            ParameterKind::Number { .. } => {
                vec![format!("{}{}", pad, self.scalar_line(prefix, path, "number", false))]
            }
            ParameterKind::Boolean { .. } => {
                vec![format!("{}{}", pad, self.scalar_line(prefix, path, "boolean", false))]
            }
            ParameterKind::Options { choices, .. } => {
                let mut head = self.head(prefix, path, "enum[string]", true);
                head.push(' ');
                if self.no_expression {
                    head.push_str(" You can't use expression.");
                }
                head.push_str(". Available values:");

                let mut lines = vec![format!("{}{}", pad, head)];
                lines.extend(choices.iter().enumerate().map(|(k, choice)| {
                    format!(
                        "{}  {}.{} value==\"{}\": {}",
                        pad, prefix, k, choice.value, choice.description
                    )
                }));
                lines
            }
            ParameterKind::Collection { children, .. } => {
                let type_label = if self.multiple_values { "list[dict]" } else { "dict" };
                let head = self.composite_head(prefix, path, type_label, ". properties description:");
                let multiple_values = self.multiple_values;
                self.with_children(head, prefix, indent, max_depth, path, children, |name| {
                    path.member(name, multiple_values)
                })
            }
            ParameterKind::FixedCollection { groups, .. } => {
                let type_label = if self.multiple_values {
                    "dict[str,list[dict[str,any]]]"
                } else {
                    "dict[str,dict[str,any]]"
                };
                let head = self.composite_head(prefix, path, type_label, ". properties description:");
                self.with_children(head, prefix, indent, max_depth, path, groups, |name| {
                    path.member(name, false)
                })
            }
            ParameterKind::ResourceLocator { modes, .. } => {
                let suffix = format!(
                    ". \"mode\" should be one of {}: ",
                    quoted_list(modes.keys().map(String::as_str))
                );
                let head = self.composite_head(
                    prefix,
                    path,
                    "dict{\"mode\":enum(str),\"values\":any}",
                    &suffix,
                );
                self.with_children(head, prefix, indent, max_depth, path, modes, |name| {
                    path.mode(name)
                })
            }
            ParameterKind::Notice { text } => vec![format!("{}{} Notice: {}", pad, prefix, text)],
        }
    }

    /// `{prefix} {path}: {type}[ = default][, requiredness]: {description}`
    fn head(&self, prefix: &str, path: &ParamPath, type_label: &str, quote_default: bool) -> String {
        let mut line = format!("{} {}: {}", prefix, path, type_label);
        if let Some(default) = &self.default {
            if quote_default {
                line.push_str(&format!(" = \"{}\"", literal_text(default)));
            } else {
                line.push_str(&format!(" = {}", default));
            }
        }
        match (&self.display_condition, self.required) {
            (Some(condition), true) => line.push_str(&format!(
                ", Required when ({}), otherwise do not provide",
                condition
            )),
            (Some(condition), false) => line.push_str(&format!(
                ", Activate(Not Required) when ({}), otherwise do not provide",
                condition
            )),
            (None, true) => line.push_str(", Required"),
            (None, false) => {}
        }
        line.push_str(&format!(": {}", self.description));
        line
    }

    fn scalar_line(&self, prefix: &str, path: &ParamPath, type_label: &str, quote_default: bool) -> String {
        let mut line = self.head(prefix, path, type_label, quote_default);
        if self.no_expression {
            line.push_str(". You can't use expression.");
        }
        line
    }

    fn composite_head(&self, prefix: &str, path: &ParamPath, type_label: &str, suffix: &str) -> String {
        let mut line = self.head(prefix, path, type_label, false);
        line.push(' ');
        if self.no_expression {
            line.push_str(" You can't use expression.");
        }
        line.push_str(suffix);
        line
    }

    #[allow(clippy::too_many_arguments)]
    fn with_children(
        &self,
        head: String,
        prefix: &str,
        indent: usize,
        max_depth: usize,
        path: &ParamPath,
        children: &ParameterTree,
        child_path: impl Fn(&str) -> ParamPath,
    ) -> Vec<String> {
        let pad = " ".repeat(indent);
        let mut lines = vec![format!("{}{}", pad, head)];
        if path.depth() >= max_depth && !self.required {
            lines.push(format!("{}  ...hidden...", pad));
            return lines;
        }
        let child_depth = if self.required { REQUIRED_DEPTH } else { max_depth };
        for (k, (name, child)) in children.iter().enumerate() {
            lines.extend(child.to_description(
                &format!("{}.{}", prefix, k),
                indent + 2,
                child_depth,
                &child_path(name),
            ));
        }
        lines
    }
}
