use super::node::NodeInstance;
use crate::catalog::{NodeMeta, NodeType};
use crate::parameter::ParameterTree;
use ahash::AHashMap;

/// Every node defined in a session, in definition order.
///
/// Ids are handed out from separate counters for triggers and actions, so the first
/// trigger is `trigger_0` and the first action is `action_0`. Nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<NodeInstance>,
    by_name: AHashMap<String, usize>,
    next_trigger_id: usize,
    next_action_id: usize,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates a node for `meta` with a freshly compiled `params` tree.
    pub fn define(
        &mut self,
        meta: NodeMeta,
        params: ParameterTree,
        comments: impl Into<String>,
        todos: Vec<String>,
    ) -> &NodeInstance {
        let counter = match meta.node_type {
            NodeType::Trigger => &mut self.next_trigger_id,
            NodeType::Action => &mut self.next_action_id,
        };
        let id = *counter;
        *counter += 1;

        let node = NodeInstance::new(id, meta, params).with_notes(comments, todos);
        let position = self.nodes.len();
        self.by_name.insert(node.name(), position);
        self.nodes.push(node);
        &self.nodes[position]
    }

    pub fn get(&self, name: &str) -> Option<&NodeInstance> {
        self.by_name.get(name).map(|&position| &self.nodes[position])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NodeInstance> {
        let position = *self.by_name.get(name)?;
        self.nodes.get_mut(position)
    }

    pub fn names(&self) -> Vec<String> {
        self.nodes.iter().map(NodeInstance::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeInstance> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
