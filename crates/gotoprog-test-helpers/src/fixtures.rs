//! Fixture builders for symbol tables and goto-programs.

use gotoprog_core::interner::{StringId, StringInterner};
use gotoprog_core::ir::class_identifier::CLASS_IDENTIFIER_FIELD;
use gotoprog_core::ir::{
    CodeType, Component, Expression, FunctionCall, GotoFunction, GotoFunctions, GotoModel,
    GotoProgram, InstructionKind, SourceLocation, StructType, Type,
};
use gotoprog_core::symbol_table::{Symbol, SymbolTable};
use std::sync::Arc;

/// Builds a symbol table of classes and methods.
///
/// Classes are laid out the way the devirtualizer expects: a root class
/// starts with the class identifier member, a derived class starts with a
/// `@<Base>` sub-object of its first base.
///
/// ```ignore
/// let table = ClassTableBuilder::new()
///     .class("Base", &[])
///     .class("Derived", &["Base"])
///     .method("Base", "run")
///     .build();
/// ```
pub struct ClassTableBuilder {
    table: SymbolTable,
}

impl ClassTableBuilder {
    pub fn new() -> Self {
        Self::with_interner(Arc::new(StringInterner::new()))
    }

    pub fn with_interner(interner: Arc<StringInterner>) -> Self {
        Self {
            table: SymbolTable::new(interner),
        }
    }

    pub fn class(mut self, name: &str, bases: &[&str]) -> Self {
        let first = match bases.first() {
            Some(base) => Component {
                name: self.table.intern(&format!("@{}", base)),
                ty: Type::symbol(self.table.intern(base)),
            },
            None => Component {
                name: self.table.intern(CLASS_IDENTIFIER_FIELD),
                ty: Type::String,
            },
        };
        let struct_type = StructType {
            components: vec![first],
            bases: bases
                .iter()
                .map(|base| Type::symbol(self.table.intern(base)))
                .collect(),
        };
        let id = self.table.intern(name);
        self.table
            .add(Symbol::new_type(id, Type::Struct(struct_type)))
            .expect("class declared twice");
        self
    }

    /// Declare `class.member`, taking a pointer to `class` as receiver.
    pub fn method(mut self, class: &str, member: &str) -> Self {
        let id = self.table.intern(&format!("{}.{}", class, member));
        let ty = method_type(self.table.intern(class));
        self.table
            .add(Symbol::new(id, ty))
            .expect("method declared twice");
        self
    }

    /// Declare a free function with no parameters.
    pub fn function(mut self, name: &str) -> Self {
        let id = self.table.intern(name);
        self.table
            .add(Symbol::new(
                id,
                Type::Code(CodeType::new(vec![], Type::Empty)),
            ))
            .expect("function declared twice");
        self
    }

    pub fn build(self) -> SymbolTable {
        self.table
    }
}

impl Default for ClassTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn method_type(class: StringId) -> Type {
    Type::Code(CodeType::new(
        vec![Type::pointer(Type::symbol(class))],
        Type::Empty,
    ))
}

/// Builds the body of one function.
///
/// Every instruction gets a location in `test.c` on its own line and is
/// attributed to the function being built.
pub struct ProgramBuilder<'a> {
    table: &'a SymbolTable,
    function: StringId,
    program: GotoProgram,
    line: u32,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(table: &'a SymbolTable, function: &str) -> Self {
        Self {
            table,
            function: table.intern(function),
            program: GotoProgram::new(),
            line: 0,
        }
    }

    fn push(&mut self, kind: InstructionKind) {
        self.line += 1;
        let mut instruction = self.program.new_instruction(kind);
        instruction.source_location = SourceLocation::new(self.table.intern("test.c"), self.line);
        instruction.source_location.function = Some(self.function);
        instruction.function = Some(self.function);
        let end = self.program.len();
        self.program.insert_before(end, vec![instruction]);
    }

    /// `this->member()` where `this` is a `static_class *`.
    pub fn virtual_call(self, static_class: &str, member: &str) -> Self {
        let class = self.table.intern(static_class);
        let this = Expression::symbol(self.table.intern("this"), Type::pointer(Type::symbol(class)));
        self.virtual_call_on(static_class, member, this)
    }

    /// Virtual call with an explicit receiver expression.
    pub fn virtual_call_on(mut self, static_class: &str, member: &str, receiver: Expression) -> Self {
        let class = self.table.intern(static_class);
        let callee = Expression::VirtualFunction {
            class,
            component: self.table.intern(member),
            ty: method_type(class),
        };
        self.push(InstructionKind::FunctionCall(FunctionCall::new(
            callee,
            vec![receiver],
        )));
        self
    }

    /// Direct call to `callee`.
    pub fn call(mut self, callee: &str) -> Self {
        let ty = self
            .table
            .lookup_str(callee)
            .map(|symbol| symbol.ty.clone())
            .unwrap_or_else(|| Type::Code(CodeType::new(vec![], Type::Empty)));
        let function = Expression::symbol(self.table.intern(callee), ty);
        self.push(InstructionKind::FunctionCall(FunctionCall::new(
            function,
            vec![],
        )));
        self
    }

    pub fn skip(mut self) -> Self {
        self.push(InstructionKind::Skip);
        self
    }

    /// Terminate the body with `END_FUNCTION` and number it.
    pub fn build(mut self) -> GotoFunction {
        self.push(InstructionKind::EndFunction);
        self.program.update();
        GotoFunction::new(self.program)
    }
}

/// Assemble a model from a table and named function bodies.
pub fn model(symbol_table: SymbolTable, functions: Vec<(&str, GotoFunction)>) -> GotoModel {
    let mut goto_functions = GotoFunctions::new();
    for (name, function) in functions {
        goto_functions.insert(symbol_table.intern(name), function);
    }
    GotoModel::new(symbol_table, goto_functions)
}

/// Names of directly called functions, in program order.
pub fn called_functions(program: &GotoProgram, table: &SymbolTable) -> Vec<String> {
    program
        .iter()
        .filter_map(|instruction| instruction.function_call())
        .filter_map(|call| call.function.identifier())
        .map(|id| table.resolve(id).to_string())
        .collect()
}

/// Classes tested by dispatch branches, in program order.
pub fn dispatch_classes(program: &GotoProgram, table: &SymbolTable) -> Vec<String> {
    program
        .iter()
        .filter_map(|instruction| match &instruction.kind {
            InstructionKind::Goto { guard, .. } => match guard {
                Expression::Equal(lhs, _) => match lhs.as_ref() {
                    Expression::Constant { value, .. } => Some(table.resolve(*value).to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect()
}
