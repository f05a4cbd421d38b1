//! Human-readable rendering of goto-programs.

use super::expr::Expression;
use super::instruction::{Instruction, InstructionKind};
use super::program::GotoProgram;
use super::types::Type;
use crate::interner::StringInterner;
use std::fmt::{self, Write};

/// Renders IR with names resolved through an interner.
pub struct Printer<'a> {
    interner: &'a StringInterner,
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Self { interner }
    }

    pub fn write_program(&self, out: &mut impl Write, program: &GotoProgram) -> fmt::Result {
        for instruction in program.iter() {
            self.write_instruction(out, program, instruction)?;
        }
        Ok(())
    }

    pub fn write_instruction(
        &self,
        out: &mut impl Write,
        program: &GotoProgram,
        instruction: &Instruction,
    ) -> fmt::Result {
        write!(out, "        // {}", instruction.location_number)?;
        let location = &instruction.source_location;
        if let (Some(file), Some(line)) = (location.file, location.line) {
            write!(out, " file {} line {}", self.interner.resolve(file), line)?;
        }
        writeln!(out)?;

        match instruction.target_number {
            Some(n) => write!(out, "{:>6}: ", n)?,
            None => write!(out, "        ")?,
        }

        match &instruction.kind {
            InstructionKind::Skip => write!(out, "SKIP")?,
            InstructionKind::Goto { target, guard } => {
                if !guard.is_true() {
                    write!(out, "IF ")?;
                    self.write_expr(out, guard)?;
                    write!(out, " THEN ")?;
                }
                match program.get(*target).and_then(|t| t.target_number) {
                    Some(n) => write!(out, "GOTO {}", n)?,
                    None => write!(out, "GOTO {}", target)?,
                }
            }
            InstructionKind::Assume(guard) => {
                write!(out, "ASSUME ")?;
                self.write_expr(out, guard)?;
            }
            InstructionKind::Assert(guard) => {
                write!(out, "ASSERT ")?;
                self.write_expr(out, guard)?;
                if let Some(comment) = &location.comment {
                    write!(out, " // {}", comment)?;
                }
            }
            InstructionKind::Assign { lhs, rhs } => {
                write!(out, "ASSIGN ")?;
                self.write_expr(out, lhs)?;
                write!(out, " := ")?;
                self.write_expr(out, rhs)?;
            }
            InstructionKind::FunctionCall(call) => {
                write!(out, "FUNCTION_CALL: ")?;
                if let Some(lhs) = &call.lhs {
                    self.write_expr(out, lhs)?;
                    write!(out, " := ")?;
                }
                self.write_expr(out, &call.function)?;
                write!(out, "(")?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    self.write_expr(out, arg)?;
                }
                write!(out, ")")?;
            }
            InstructionKind::Return(value) => {
                write!(out, "RETURN")?;
                if let Some(value) = value {
                    write!(out, " ")?;
                    self.write_expr(out, value)?;
                }
            }
            InstructionKind::EndFunction => write!(out, "END_FUNCTION")?,
        }
        writeln!(out)
    }

    pub fn write_expr(&self, out: &mut impl Write, expr: &Expression) -> fmt::Result {
        match expr {
            Expression::Symbol { identifier, .. } => {
                write!(out, "{}", self.interner.resolve(*identifier))
            }
            Expression::Constant { value, ty } => match ty {
                Type::String => write!(out, "\"{}\"", self.interner.resolve(*value)),
                _ => write!(out, "{}", self.interner.resolve(*value)),
            },
            Expression::True => write!(out, "TRUE"),
            Expression::False => write!(out, "FALSE"),
            Expression::Typecast { op, ty } => {
                write!(out, "(")?;
                self.write_type(out, ty)?;
                write!(out, ")")?;
                self.write_expr(out, op)
            }
            Expression::Dereference { pointer, .. } => {
                write!(out, "*")?;
                self.write_expr(out, pointer)
            }
            Expression::Member {
                compound,
                component,
                ..
            } => {
                write!(out, "(")?;
                self.write_expr(out, compound)?;
                write!(out, ").{}", self.interner.resolve(*component))
            }
            Expression::Equal(lhs, rhs) => {
                self.write_expr(out, lhs)?;
                write!(out, " == ")?;
                self.write_expr(out, rhs)
            }
            Expression::Not(op) => {
                write!(out, "!")?;
                self.write_expr(out, op)
            }
            Expression::VirtualFunction {
                class, component, ..
            } => write!(
                out,
                "virtual_function({}.{})",
                self.interner.resolve(*class),
                self.interner.resolve(*component)
            ),
        }
    }

    pub fn write_type(&self, out: &mut impl Write, ty: &Type) -> fmt::Result {
        match ty {
            Type::Empty => write!(out, "void"),
            Type::Bool => write!(out, "bool"),
            Type::Signed(width) => write!(out, "signed_{}", width),
            Type::Unsigned(width) => write!(out, "unsigned_{}", width),
            Type::String => write!(out, "string"),
            Type::Pointer(subtype) => {
                self.write_type(out, subtype)?;
                write!(out, " *")
            }
            Type::Symbol(identifier) => write!(out, "{}", self.interner.resolve(*identifier)),
            Type::Struct(_) => write!(out, "struct"),
            Type::Code(_) => write!(out, "code"),
        }
    }
}
