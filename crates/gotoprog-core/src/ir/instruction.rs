//! Goto-program instructions.

use super::expr::Expression;
use super::source_location::SourceLocation;
use crate::interner::StringId;
use std::fmt;

/// Stable handle to an instruction within one [`GotoProgram`](super::GotoProgram).
///
/// Handles survive insertion and removal of other instructions, so jump
/// targets stay valid across splices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructionId(pub(crate) u32);

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub lhs: Option<Expression>,
    pub function: Expression,
    pub arguments: Vec<Expression>,
}

impl FunctionCall {
    pub fn new(function: Expression, arguments: Vec<Expression>) -> Self {
        Self {
            lhs: None,
            function,
            arguments,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.function.is_virtual_function()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    Skip,
    Goto {
        target: InstructionId,
        guard: Expression,
    },
    Assume(Expression),
    Assert(Expression),
    Assign {
        lhs: Expression,
        rhs: Expression,
    },
    FunctionCall(FunctionCall),
    Return(Option<Expression>),
    EndFunction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    id: InstructionId,
    pub kind: InstructionKind,
    pub source_location: SourceLocation,
    /// Function this instruction belongs to.
    pub function: Option<StringId>,
    pub location_number: u32,
    /// Label number, set by `GotoProgram::update` on jump targets only.
    pub target_number: Option<u32>,
    /// Instructions that can transfer control here, set by `GotoProgram::update`.
    pub incoming_edges: Vec<InstructionId>,
}

impl Instruction {
    pub(crate) fn new(id: InstructionId, kind: InstructionKind) -> Self {
        Self {
            id,
            kind,
            source_location: SourceLocation::default(),
            function: None,
            location_number: 0,
            target_number: None,
            incoming_edges: Vec::new(),
        }
    }

    pub fn id(&self) -> InstructionId {
        self.id
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.kind, InstructionKind::Skip)
    }

    pub fn is_goto(&self) -> bool {
        matches!(self.kind, InstructionKind::Goto { .. })
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self.kind, InstructionKind::FunctionCall(_))
    }

    pub fn is_virtual_call(&self) -> bool {
        matches!(&self.kind, InstructionKind::FunctionCall(call) if call.is_virtual())
    }

    pub fn function_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            InstructionKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    pub fn function_call_mut(&mut self) -> Option<&mut FunctionCall> {
        match &mut self.kind {
            InstructionKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    /// Jump target of a goto.
    pub fn target(&self) -> Option<InstructionId> {
        match &self.kind {
            InstructionKind::Goto { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn guard(&self) -> Option<&Expression> {
        match &self.kind {
            InstructionKind::Goto { guard, .. }
            | InstructionKind::Assume(guard)
            | InstructionKind::Assert(guard) => Some(guard),
            _ => None,
        }
    }

    /// Whether control can continue with the next instruction.
    pub fn falls_through(&self) -> bool {
        match &self.kind {
            InstructionKind::Goto { guard, .. } => !guard.is_true(),
            InstructionKind::Return(_) | InstructionKind::EndFunction => false,
            _ => true,
        }
    }

    pub fn make_skip(&mut self) {
        self.kind = InstructionKind::Skip;
    }

    pub fn make_function_call(&mut self, call: FunctionCall) {
        self.kind = InstructionKind::FunctionCall(call);
    }

    pub fn make_goto(&mut self, target: InstructionId, guard: Expression) {
        self.kind = InstructionKind::Goto { target, guard };
    }

    pub fn make_unconditional_goto(&mut self, target: InstructionId) {
        self.make_goto(target, Expression::True);
    }

    pub fn make_assertion(&mut self, guard: Expression) {
        self.kind = InstructionKind::Assert(guard);
    }
}
