use natc_interner::Istr;

use crate::{Node, SetReg};

/// An ordered sequence of nodes. Order is significant: a tuple may only read
/// registers defined by an earlier tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub nodes: Vec<Node>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Top-level assignments, in program order.
    pub fn assignments(&self) -> impl Iterator<Item = (Istr, &Node)> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::SetVar { name, value } => Some((*name, &**value)),
            _ => None,
        })
    }

    /// Register-defining tuples with their position in the program.
    pub fn tuples(&self) -> impl Iterator<Item = (usize, &SetReg)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_set_reg().map(|set_reg| (i, set_reg)))
    }

    pub fn tuples_mut(&mut self) -> impl Iterator<Item = (usize, &mut SetReg)> + '_ {
        self.nodes
            .iter_mut()
            .enumerate()
            .filter_map(|(i, node)| node.as_set_reg_mut().map(|set_reg| (i, set_reg)))
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
