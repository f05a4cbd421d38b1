//! Goto-program bodies.
//!
//! A [`GotoProgram`] is an ordered instruction list. Jumps name their target
//! by [`InstructionId`], never by position, so code can be spliced in or cut
//! out without patching the remaining jumps. Ids are allocated by the
//! program itself; instructions built for one program must not be inserted
//! into another.

use super::instruction::{Instruction, InstructionId, InstructionKind};
use rustc_hash::FxHashMap;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GotoProgram {
    instructions: Vec<Instruction>,
    next_id: u32,
}

impl GotoProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instructions_mut(&mut self) -> &mut [Instruction] {
        &mut self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Allocate a fresh instruction owned by this program without placing it.
    pub fn new_instruction(&mut self, kind: InstructionKind) -> Instruction {
        let id = InstructionId(self.next_id);
        self.next_id += 1;
        Instruction::new(id, kind)
    }

    /// Append a new instruction and return its handle.
    pub fn add_instruction(&mut self, kind: InstructionKind) -> InstructionId {
        let instruction = self.new_instruction(kind);
        let id = instruction.id();
        self.instructions.push(instruction);
        id
    }

    /// Position of the instruction with handle `id`.
    pub fn position(&self, id: InstructionId) -> Option<usize> {
        self.instructions.iter().position(|i| i.id() == id)
    }

    pub fn get(&self, id: InstructionId) -> Option<&Instruction> {
        self.instructions.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: InstructionId) -> Option<&mut Instruction> {
        self.instructions.iter_mut().find(|i| i.id() == id)
    }

    /// Splice `code` in directly after position `index`.
    pub fn insert_after(&mut self, index: usize, code: Vec<Instruction>) {
        self.insert_before(index + 1, code);
    }

    /// Splice `code` in at position `index`, shifting later instructions.
    pub fn insert_before(&mut self, index: usize, code: Vec<Instruction>) {
        debug_assert!(
            code.iter().all(|i| i.id().0 < self.next_id),
            "spliced instructions were not allocated by this program"
        );
        self.instructions.splice(index..index, code);
    }

    /// Move all of `code` to the end of the program, leaving `code` empty.
    pub fn destructive_append(&mut self, code: &mut Vec<Instruction>) {
        debug_assert!(
            code.iter().all(|i| i.id().0 < self.next_id),
            "appended instructions were not allocated by this program"
        );
        self.instructions.append(code);
    }

    /// Cut the instructions in `range` out of the program.
    ///
    /// Jumps into the removed range are left dangling; callers retarget them
    /// first.
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<Instruction> {
        self.instructions.drain(range).collect()
    }

    /// Recompute incoming edges, target numbers and local location numbers.
    pub fn update(&mut self) {
        self.compute_incoming_edges();
        self.compute_target_numbers();
        self.compute_location_numbers(0);
    }

    /// Number instructions consecutively from `start`; returns the next free number.
    pub fn compute_location_numbers(&mut self, start: u32) -> u32 {
        let mut next = start;
        for instruction in &mut self.instructions {
            instruction.location_number = next;
            next += 1;
        }
        next
    }

    /// Label every jump target with a number, in program order, starting at 1.
    pub fn compute_target_numbers(&mut self) {
        let targets: Vec<InstructionId> = self
            .instructions
            .iter()
            .filter_map(Instruction::target)
            .collect();

        let mut next = 1;
        for instruction in &mut self.instructions {
            if targets.contains(&instruction.id()) {
                instruction.target_number = Some(next);
                next += 1;
            } else {
                instruction.target_number = None;
            }
        }
    }

    pub fn compute_incoming_edges(&mut self) {
        let mut incoming: FxHashMap<InstructionId, Vec<InstructionId>> = FxHashMap::default();

        for (index, instruction) in self.instructions.iter().enumerate() {
            if let Some(target) = instruction.target() {
                incoming.entry(target).or_default().push(instruction.id());
            }
            if instruction.falls_through() {
                if let Some(next) = self.instructions.get(index + 1) {
                    incoming.entry(next.id()).or_default().push(instruction.id());
                }
            }
        }

        for instruction in &mut self.instructions {
            let mut edges = incoming.remove(&instruction.id()).unwrap_or_default();
            edges.dedup();
            instruction.incoming_edges = edges;
        }
    }
}
