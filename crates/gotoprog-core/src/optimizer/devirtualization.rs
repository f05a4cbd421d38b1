//! Virtual call removal
//!
//! Lowers every call through a `virtual_function(C.m)` callee into explicit
//! dispatch on the receiver's runtime class identifier:
//!
//! ```text
//!     IF "D1" == this->@class_identifier THEN GOTO 2
//!     IF "D2" == this->@class_identifier THEN GOTO 3
//!  1: C.m(this)          // base case, reached by falling through
//!     GOTO 4
//!  2: D1.m((D1 *)this)
//!     GOTO 4
//!  3: D2.m((D2 *)this)
//!     GOTO 4
//!  4: SKIP
//! ```
//!
//! Call sites with a single candidate are rewritten in place, and call sites
//! with no candidate at all become `SKIP`.

use super::analysis::{CallTarget, ClassHierarchy, OverrideResolver};
use super::{GotoPass, ModelFeatures};
use crate::config::PassConfig;
use crate::errors::PassError;
use crate::interner::StringId;
use crate::ir::class_identifier::class_identifier_field;
use crate::ir::expr::Expression;
use crate::ir::functions::GotoFunctions;
use crate::ir::instruction::{FunctionCall, Instruction, InstructionId, InstructionKind};
use crate::ir::model::GotoModel;
use crate::ir::program::GotoProgram;
use crate::ir::types::Type;
use crate::symbol_table::SymbolTable;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, trace};

/// Comment attached to the assertion emitted for a class with no definition.
pub const MISSING_DEFINITION_COMMENT: &str = "no definition for this type";

/// Rewrites virtual calls against one class hierarchy snapshot.
pub struct VirtualCallRemover<'a> {
    symbol_table: &'a SymbolTable,
    resolver: OverrideResolver<'a>,
    class_identifier_field: StringId,
    assert_on_missing_definition: bool,
}

impl<'a> VirtualCallRemover<'a> {
    pub fn new(
        symbol_table: &'a SymbolTable,
        hierarchy: &'a ClassHierarchy,
        config: &PassConfig,
    ) -> Self {
        Self {
            symbol_table,
            resolver: OverrideResolver::new(hierarchy, symbol_table),
            class_identifier_field: symbol_table.intern(&config.class_identifier_field),
            assert_on_missing_definition: config.assert_on_missing_definition,
        }
    }

    /// Lower the virtual call at position `index` of `program`.
    ///
    /// Returns whether the program changed, which is always the case for a
    /// virtual call.
    ///
    /// # Panics
    ///
    /// Panics if the instruction is not a virtual call or the call has no
    /// receiver argument.
    pub fn rewrite_call(&self, program: &mut GotoProgram, index: usize) -> bool {
        let instruction = &program.instructions()[index];
        let call = match instruction.function_call() {
            Some(call) => call.clone(),
            None => panic!("instruction {} is not a function call", instruction.id()),
        };
        let (static_class, member) = match &call.function {
            Expression::VirtualFunction {
                class, component, ..
            } => (*class, *component),
            _ => panic!("instruction {} is not a virtual call", instruction.id()),
        };
        assert!(
            !call.arguments.is_empty(),
            "virtual call {} has no receiver argument",
            instruction.id()
        );
        let location = instruction.source_location.clone();
        let function = instruction.function;

        let candidates = self.resolver.virtual_callsite_targets(static_class, member);
        debug!(
            class = %self.symbol_table.resolve(static_class),
            member = %self.symbol_table.resolve(member),
            candidates = candidates.len(),
            "devirtualizing call site"
        );

        let Some(base) = candidates.last() else {
            // Nothing reachable implements the member.
            program.instructions_mut()[index].make_skip();
            return true;
        };

        if candidates.len() == 1 {
            let target = &mut program.instructions_mut()[index];
            match &base.target {
                CallTarget::Resolved(resolved) => {
                    if let Some(call) = target.function_call_mut() {
                        call.function = resolved.symbol_expr();
                    }
                }
                CallTarget::Unresolved => target.make_skip(),
            }
            return true;
        }

        let final_skip = program.new_instruction(InstructionKind::Skip);
        let final_id = final_skip.id();

        let this_expr = &call.arguments[0];
        let class_id = class_identifier_field(
            this_expr,
            base.class_id,
            self.class_identifier_field,
            self.symbol_table,
        );

        let mut gotos = Vec::new();
        let mut calls = Vec::new();
        let mut blocks: FxHashMap<Option<StringId>, InstructionId> = FxHashMap::default();

        for candidate in candidates.iter().rev() {
            let block = match blocks.entry(candidate.target.identifier()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let head = self.call_block(program, &call, &candidate.target);
                    let head_id = head.id();
                    calls.push(head);
                    let mut jump = program.new_instruction(InstructionKind::Skip);
                    jump.make_unconditional_goto(final_id);
                    calls.push(jump);
                    *entry.insert(head_id)
                }
            };

            if candidate.target != base.target {
                trace!(
                    class = %self.symbol_table.resolve(candidate.class_id),
                    block = %block,
                    "dispatch branch"
                );
                let guard = Expression::equal(
                    Expression::string_constant(candidate.class_id),
                    class_id.clone(),
                );
                gotos.push(program.new_instruction(InstructionKind::Goto {
                    target: block,
                    guard,
                }));
            }
        }

        let mut new_code = gotos;
        new_code.append(&mut calls);
        new_code.push(final_skip);

        for instruction in &mut new_code {
            let property_class = instruction.source_location.property_class.take();
            let comment = instruction.source_location.comment.take();
            instruction.source_location = location.clone();
            instruction.function = function;
            if property_class.is_some() {
                instruction.source_location.property_class = property_class;
            }
            if comment.is_some() {
                instruction.source_location.comment = comment;
            }
        }

        program.insert_after(index, new_code);
        program.instructions_mut()[index].make_skip();
        true
    }

    fn call_block(
        &self,
        program: &mut GotoProgram,
        call: &FunctionCall,
        target: &CallTarget,
    ) -> Instruction {
        match target {
            CallTarget::Resolved(resolved) => {
                let mut new_call = call.clone();
                new_call.function = resolved.symbol_expr();
                let need_type = Type::pointer(Type::symbol(resolved.class));
                if !self
                    .symbol_table
                    .type_eq(&new_call.arguments[0].ty(), &need_type)
                {
                    new_call.arguments[0] = new_call.arguments[0].clone().typecast(need_type);
                }
                program.new_instruction(InstructionKind::FunctionCall(new_call))
            }
            CallTarget::Unresolved if self.assert_on_missing_definition => {
                let mut assertion = program.new_instruction(InstructionKind::Skip);
                assertion.make_assertion(Expression::False);
                assertion.source_location.comment = Some(MISSING_DEFINITION_COMMENT.to_string());
                assertion
            }
            CallTarget::Unresolved => program.new_instruction(InstructionKind::Skip),
        }
    }

    /// Lower every virtual call in `program`; runs `update` if anything changed.
    pub fn rewrite_program(&self, program: &mut GotoProgram) -> bool {
        let mut changed = false;
        let mut index = 0;
        while index < program.len() {
            if program.instructions()[index].is_virtual_call() {
                changed |= self.rewrite_call(program, index);
            }
            index += 1;
        }

        if changed {
            program.update();
        }
        changed
    }

    /// Lower every virtual call in every function of the table.
    pub fn rewrite_functions(&self, functions: &mut GotoFunctions) -> bool {
        let mut changed = false;
        for (name, function) in functions.iter_mut() {
            if self.rewrite_program(&mut function.body) {
                debug!(function = %self.symbol_table.resolve(name), "removed virtual calls");
                changed = true;
            }
        }

        if changed {
            functions.compute_location_numbers();
        }
        changed
    }
}

/// Remove all virtual calls of a model, using the default configuration.
pub fn remove_virtual_functions(model: &mut GotoModel) -> bool {
    remove_virtual_functions_in(&model.symbol_table, &mut model.goto_functions)
}

pub fn remove_virtual_functions_in(symbol_table: &SymbolTable, functions: &mut GotoFunctions) -> bool {
    let hierarchy = ClassHierarchy::build(symbol_table);
    VirtualCallRemover::new(symbol_table, &hierarchy, &PassConfig::default())
        .rewrite_functions(functions)
}

/// Devirtualization pass.
///
/// Uses the shared hierarchy from whole-program analysis when one was set,
/// and builds its own from the model's symbol table otherwise.
pub struct DevirtualizationPass {
    config: PassConfig,
    class_hierarchy: Option<Arc<ClassHierarchy>>,
}

impl DevirtualizationPass {
    pub fn new(config: &PassConfig) -> Self {
        Self {
            config: config.clone(),
            class_hierarchy: None,
        }
    }

    pub fn set_class_hierarchy(&mut self, hierarchy: Arc<ClassHierarchy>) {
        self.class_hierarchy = Some(hierarchy);
    }
}

impl GotoPass for DevirtualizationPass {
    fn name(&self) -> &'static str {
        "devirtualization"
    }

    fn required_features(&self) -> ModelFeatures {
        ModelFeatures::HAS_VIRTUAL_CALLS
    }

    fn run(&mut self, model: &mut GotoModel) -> Result<bool, PassError> {
        let hierarchy = match &self.class_hierarchy {
            Some(hierarchy) => hierarchy.clone(),
            None => Arc::new(ClassHierarchy::build(&model.symbol_table)),
        };
        let remover = VirtualCallRemover::new(&model.symbol_table, &hierarchy, &self.config);
        Ok(remover.rewrite_functions(&mut model.goto_functions))
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
