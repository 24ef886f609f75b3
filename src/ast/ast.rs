use crate::Span;

use super::{
    entities::{Function, Variable},
    expressions::{BinaryOp, Literal, UnaryOp},
    types::Type,
};

/// Index of a node in an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every node kind of the language.
///
/// Children are referenced by id. After analysis, identifier references point
/// at `Variable`/`Function` entity nodes instead of `Identifier` nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<NodeId>,
    },
    Block {
        body: Vec<NodeId>,
    },

    // Statements
    Declaration {
        declared_type: Type,
        target: NodeId,
        source: NodeId,
    },
    Assignment {
        target: NodeId,
        source: NodeId,
    },
    Increment {
        target: NodeId,
    },
    Decrement {
        target: NodeId,
    },
    FunctionDeclaration {
        return_type: Type,
        name: String,
        params: Vec<NodeId>,
        body: NodeId,
        function: Option<NodeId>,
    },
    Parameter {
        param_type: Type,
        name: String,
        variable: Option<NodeId>,
    },
    Return {
        value: NodeId,
    },
    ShortReturn,
    Break,
    /// `alternate` is either a `Block` or a trailing `If` (else-if chain).
    If {
        test: NodeId,
        consequence: NodeId,
        alternate: Option<NodeId>,
    },
    While {
        test: NodeId,
        body: NodeId,
    },
    For {
        declaration: NodeId,
        test: NodeId,
        step: NodeId,
        body: NodeId,
    },

    // Expressions
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    Conditional {
        test: NodeId,
        consequence: NodeId,
        alternate: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Identifier {
        name: String,
    },
    Literal(Literal),
    Array {
        elements: Vec<NodeId>,
    },
    Set {
        elements: Vec<NodeId>,
    },
    /// A dictionary literal. With no entries this is the ambiguous `{}`.
    Dict {
        entries: Vec<NodeId>,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
    },
    Index {
        collection: NodeId,
        index: NodeId,
    },
    Property {
        object: NodeId,
        property: String,
    },
    ListComprehension {
        element: NodeId,
        binding: String,
        collection: NodeId,
        condition: Option<NodeId>,
        variable: Option<NodeId>,
    },

    // Entities
    Variable(Variable),
    Function(Function),
}

impl NodeKind {
    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { body } | NodeKind::Block { body } => body.clone(),
            NodeKind::Declaration { target, source, .. }
            | NodeKind::Assignment { target, source } => vec![*target, *source],
            NodeKind::Increment { target } | NodeKind::Decrement { target } => vec![*target],
            NodeKind::FunctionDeclaration {
                params,
                body,
                function,
                ..
            } => function
                .iter()
                .chain(params.iter())
                .chain(std::iter::once(body))
                .copied()
                .collect(),
            NodeKind::Parameter { variable, .. } => variable.iter().copied().collect(),
            NodeKind::Return { value } => vec![*value],
            NodeKind::If {
                test,
                consequence,
                alternate,
            } => [*test, *consequence]
                .into_iter()
                .chain(alternate.iter().copied())
                .collect(),
            NodeKind::While { test, body } => vec![*test, *body],
            NodeKind::For {
                declaration,
                test,
                step,
                body,
            } => vec![*declaration, *test, *step, *body],
            NodeKind::Call { callee, args } => std::iter::once(*callee)
                .chain(args.iter().copied())
                .collect(),
            NodeKind::Conditional {
                test,
                consequence,
                alternate,
            } => vec![*test, *consequence, *alternate],
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Array { elements } | NodeKind::Set { elements } => elements.clone(),
            NodeKind::Dict { entries } => entries.clone(),
            NodeKind::KeyValue { key, value } => vec![*key, *value],
            NodeKind::Index { collection, index } => vec![*collection, *index],
            NodeKind::Property { object, .. } => vec![*object],
            NodeKind::ListComprehension {
                element,
                collection,
                condition,
                variable,
                ..
            } => variable
                .iter()
                .copied()
                .chain([*collection, *element])
                .chain(condition.iter().copied())
                .collect(),
            NodeKind::ShortReturn
            | NodeKind::Break
            | NodeKind::Identifier { .. }
            | NodeKind::Literal(_)
            | NodeKind::Variable(_)
            | NodeKind::Function(_) => vec![],
        }
    }

    /// Whether this is an empty array, set or dict literal.
    pub fn is_empty_literal(&self) -> bool {
        match self {
            NodeKind::Array { elements } | NodeKind::Set { elements } => elements.is_empty(),
            NodeKind::Dict { entries } => entries.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Absent until the analyzer has visited the node.
    pub ty: Option<Type>,
}

/// Arena holding every node of one program.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: vec![] }
    }

    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.nodes.push(Node {
            kind,
            span,
            ty: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.get(id).span
    }

    pub fn ty(&self, id: NodeId) -> Option<&Type> {
        self.get(id).ty.as_ref()
    }

    pub fn replace_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.get_mut(id).kind = kind;
    }

    pub fn set_type(&mut self, id: NodeId, ty: Type) {
        self.get_mut(id).ty = Some(ty);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A parsed (and possibly analyzed) program: the arena plus its root node.
#[derive(Debug, Clone)]
pub struct Program {
    pub ast: Ast,
    pub root: NodeId,
}

impl Program {
    /// Statements of the root `Program` node.
    pub fn body(&self) -> &[NodeId] {
        match self.ast.kind(self.root) {
            NodeKind::Program { body } => body,
            _ => &[],
        }
    }
}
