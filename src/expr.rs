//! Expression trees.
//!
//! A tree is an arena of [`Node`]s with a designated root. Nodes only refer
//! to their children by [`NodeId`], and a child is always pushed before its
//! parent, so every child id is strictly smaller than its parent's id: the
//! structure cannot contain a cycle. Once an [`Expr`] is handed out nothing
//! can mutate it; evaluation and rendering only read.
pub mod eval;
pub mod render;

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{SemanticType, Value};

pub use eval::evaluate;
pub use render::render;

// ------------------------------- Nodes ----------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize { self.0 as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    IntAdd,
    BoolAnd,
    StrConcat,
}

impl BinaryOp {
    pub fn result_type(self) -> SemanticType {
        match self {
            BinaryOp::IntAdd => SemanticType::Integer,
            BinaryOp::BoolAnd => SemanticType::Boolean,
            BinaryOp::StrConcat => SemanticType::String,
        }
    }

    /// Both operands share the result type.
    pub fn operand_type(self) -> SemanticType {
        self.result_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    ListLen,
}

impl UnaryOp {
    pub fn result_type(self) -> SemanticType {
        match self {
            UnaryOp::ListLen => SemanticType::Integer,
        }
    }

    pub fn operand_type(self) -> SemanticType {
        match self {
            UnaryOp::ListLen => SemanticType::ANY_LIST,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Const(Value),
    /// Refers to a parameter by name; the value comes from the environment.
    ParamRef { name: String, ty: SemanticType },
    Binary { op: BinaryOp, lhs: NodeId, rhs: NodeId },
    Unary { op: UnaryOp, operand: NodeId },
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Const(_) | Node::ParamRef { .. })
    }

    /// Type this node produces, read off the node alone.
    pub fn declared_type(&self) -> SemanticType {
        match self {
            Node::Const(Value::Int(_)) => SemanticType::Integer,
            Node::Const(Value::Bool(_)) => SemanticType::Boolean,
            Node::Const(Value::Str(_)) => SemanticType::String,
            Node::Const(Value::List(_)) => SemanticType::ANY_LIST,
            Node::ParamRef { ty, .. } => *ty,
            Node::Binary { op, .. } => op.result_type(),
            Node::Unary { op, .. } => op.result_type(),
        }
    }
}

// ------------------------------- Trees ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Expr {
    pub fn root(&self) -> NodeId { self.root }

    pub fn node(&self, id: NodeId) -> &Node { &self.nodes[id.index()] }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Declared type of the root.
    pub fn ty(&self) -> SemanticType { self.type_of(self.root) }

    pub fn type_of(&self, id: NodeId) -> SemanticType {
        self.node(id).declared_type()
    }

    /// Longest chain of nodes from the root to a leaf; a lone terminal is 1.
    pub fn depth(&self) -> usize {
        // children precede parents, so one forward pass suffices
        let mut depth = vec![0usize; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            depth[i] = match node {
                Node::Const(_) | Node::ParamRef { .. } => 1,
                Node::Binary { lhs, rhs, .. } => 1 + depth[lhs.index()].max(depth[rhs.index()]),
                Node::Unary { operand, .. } => 1 + depth[operand.index()],
            };
        }
        depth[self.root.index()]
    }

    /// Distinct parameter names the tree refers to, in first-use order.
    pub fn referenced_parameters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for node in &self.nodes {
            if let Node::ParamRef { name, .. } = node {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn structure(&self) -> String {
        render::render_structure(self)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

// ------------------------------ Building --------------------------------- //

/// Append-only arena used while a tree is being synthesized. Only
/// [`ExprBuilder::finish`] turns it into an [`Expr`], so a failed synthesis
/// leaves nothing observable behind.
///
/// Every operator checks its operands against its signature and takes each
/// child at most once, so whatever `finish` accepts is a well-typed tree in
/// which every node is reachable from the root.
#[derive(Debug, Default)]
pub struct ExprBuilder {
    nodes: Vec<Node>,
    has_parent: Vec<bool>,
}

impl ExprBuilder {
    pub fn new() -> Self { Self::default() }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.has_parent.push(false);
        id
    }

    pub fn constant(&mut self, value: Value) -> NodeId {
        self.push(Node::Const(value))
    }

    pub fn param(&mut self, name: impl Into<String>, ty: SemanticType) -> NodeId {
        self.push(Node::ParamRef { name: name.into(), ty })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> Result<NodeId> {
        if lhs == rhs {
            return Err(Error::MalformedTree(format!("node {} used as both operands", lhs.index())));
        }
        let name = format!("{op:?}");
        self.check_operand(&name, lhs, op.operand_type())?;
        self.check_operand(&name, rhs, op.operand_type())?;
        self.has_parent[lhs.index()] = true;
        self.has_parent[rhs.index()] = true;
        Ok(self.push(Node::Binary { op, lhs, rhs }))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> Result<NodeId> {
        self.check_operand(&format!("{op:?}"), operand, op.operand_type())?;
        self.has_parent[operand.index()] = true;
        Ok(self.push(Node::Unary { op, operand }))
    }

    fn check_operand(&self, op: &str, id: NodeId, expected: SemanticType) -> Result<()> {
        let Some(node) = self.nodes.get(id.index()) else {
            return Err(Error::MalformedTree(format!("node {} does not exist", id.index())));
        };
        if self.has_parent[id.index()] {
            return Err(Error::MalformedTree(format!("node {} already has a parent", id.index())));
        }
        let found = node.declared_type();
        if !expected.accepts(&found) {
            return Err(Error::OperandType { op: op.to_string(), expected, found });
        }
        Ok(())
    }

    /// Seal the arena with `root` as its entry point. `root` must be the
    /// only node without a parent.
    pub fn finish(self, root: NodeId) -> Result<Expr> {
        let open: Vec<usize> = (0..self.nodes.len()).filter(|&i| !self.has_parent[i]).collect();
        match open.as_slice() {
            [] => Err(Error::MalformedTree("no nodes were built".into())),
            [only] if *only == root.index() => Ok(Expr { nodes: self.nodes, root }),
            [_] => Err(Error::MalformedTree(format!("node {} is not the root", root.index()))),
            _ => Err(Error::MalformedTree(format!("{} nodes have no parent", open.len()))),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
