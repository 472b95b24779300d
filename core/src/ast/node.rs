//! AST storage.
//!
//! Expressions are allocated in an arena owned by [`Ast`] and referenced by
//! [`ExprId`]; statements are plain owned structs. Constructors that can
//! produce a malformed shape return [`AstError`] instead.

use serde::Serialize;

use crate::location::Location;

use super::err::AstError;
use super::kind::{BinaryOperator, ExprKind, Factor};

/// Handle to an expression node inside one [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprNode {
    id: ExprId,
    pub kind: ExprKind,
    pub location: Option<Location>,
}

impl ExprNode {
    pub fn get_id(&self) -> ExprId {
        self.id
    }
    pub fn get_kind(&self) -> &ExprKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Declaration(Declaration),
    Assignment(Assignment),
    Condition(Condition),
    Loop(Loop),
}

impl Stmt {
    pub fn location(&self) -> Option<&Location> {
        match self {
            Stmt::Declaration(d) => d.location.as_ref(),
            Stmt::Assignment(a) => a.location.as_ref(),
            Stmt::Condition(c) => c.location.as_ref(),
            Stmt::Loop(l) => l.location.as_ref(),
        }
    }
}

/// Top-level program: statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Goal {
    statements: Vec<Stmt>,
}

impl Goal {
    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    target: Factor,
    value: ExprId,
    location: Option<Location>,
}

impl Assignment {
    pub fn new(target: Factor, value: ExprId, location: Option<Location>) -> Result<Self, AstError> {
        if !target.is_identifier() {
            return Err(AstError::NonIdentifierTarget { text: target.text });
        }
        Ok(Assignment { target, value, location })
    }

    pub fn target(&self) -> &Factor {
        &self.target
    }
    pub fn name(&self) -> &str {
        &self.target.text
    }
    pub fn value(&self) -> ExprId {
        self.value
    }
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    names: Vec<String>,
    initializers: Vec<ExprId>,
    location: Option<Location>,
}

impl Declaration {
    pub fn new(
        names: Vec<String>,
        initializers: Vec<ExprId>,
        location: Option<Location>,
    ) -> Result<Self, AstError> {
        if names.is_empty() {
            return Err(AstError::EmptyDeclaration);
        }
        if initializers.len() > names.len() {
            return Err(AstError::TooManyInitializers {
                names: names.len(),
                initializers: initializers.len(),
            });
        }
        Ok(Declaration { names, initializers, location })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn initializers(&self) -> &[ExprId] {
        &self.initializers
    }
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Initializer bound to the name at `index`, if any.
    ///
    /// Initializers bind to the trailing names: with `n` names and `k`
    /// initializers, names `0..n-k` have none and are zero-filled.
    pub fn initializer_for(&self, index: usize) -> Option<ExprId> {
        let first_initialized = self.names.len() - self.initializers.len();
        if index < first_initialized {
            None
        } else {
            self.initializers.get(index - first_initialized).copied()
        }
    }
}

/// Straight-line body of a loop or conditional branch (`begin ... end`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    assignments: Vec<Assignment>,
}

impl Block {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Block { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loop {
    condition: ExprId,
    body: Block,
    location: Option<Location>,
}

impl Loop {
    pub fn new(condition: ExprId, body: Block, location: Option<Location>) -> Self {
        Loop { condition, body, location }
    }

    pub fn condition(&self) -> ExprId {
        self.condition
    }
    pub fn body(&self) -> &Block {
        &self.body
    }
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// `if`/`elif`*/`else`? chain. `bodies` has one entry per guard plus an
/// optional trailing else body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    guards: Vec<ExprId>,
    bodies: Vec<Block>,
    location: Option<Location>,
}

impl Condition {
    pub fn new(guards: Vec<ExprId>, bodies: Vec<Block>, location: Option<Location>) -> Result<Self, AstError> {
        if guards.is_empty() || (bodies.len() != guards.len() && bodies.len() != guards.len() + 1) {
            return Err(AstError::BodyCountMismatch {
                guards: guards.len(),
                bodies: bodies.len(),
            });
        }
        Ok(Condition { guards, bodies, location })
    }

    pub fn guards(&self) -> &[ExprId] {
        &self.guards
    }
    pub fn bodies(&self) -> &[Block] {
        &self.bodies
    }
    pub fn else_body(&self) -> Option<&Block> {
        if self.bodies.len() == self.guards.len() + 1 {
            self.bodies.last()
        } else {
            None
        }
    }
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// One parsed program: the expression arena plus the statement tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ast {
    exprs: Vec<ExprNode>,
    #[serde(skip)]
    has_parent: Vec<bool>,
    goal: Goal,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    fn alloc(&mut self, kind: ExprKind, location: Option<Location>) -> ExprId {
        let id = ExprId(self.exprs.len());
        self.exprs.push(ExprNode { id, kind, location });
        self.has_parent.push(false);
        id
    }

    pub fn factor(&mut self, factor: Factor, location: Option<Location>) -> ExprId {
        self.alloc(ExprKind::Factor(factor), location)
    }

    /// Both operands must already live in this arena and must not have a
    /// parent yet, so every node owns its children exclusively. Children are
    /// always allocated before their parent, which keeps the tree acyclic.
    pub fn binary(
        &mut self,
        op: BinaryOperator,
        left: ExprId,
        right: ExprId,
        location: Option<Location>,
    ) -> Result<ExprId, AstError> {
        for operand in [left, right] {
            match self.has_parent.get(operand.0) {
                None => return Err(AstError::UnknownExpression { index: operand.0 }),
                Some(true) => return Err(AstError::SharedExpression { index: operand.0 }),
                Some(false) => {}
            }
        }
        if left == right {
            return Err(AstError::SharedExpression { index: left.0 });
        }
        self.has_parent[left.0] = true;
        self.has_parent[right.0] = true;
        Ok(self.alloc(ExprKind::BinaryOp { op, left, right }, location))
    }

    pub fn expr(&self, id: ExprId) -> Option<&ExprNode> {
        self.exprs.get(id.0)
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn push_statement(&mut self, stmt: Stmt) {
        self.goal.statements.push(stmt);
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.goal.statements
    }
}
