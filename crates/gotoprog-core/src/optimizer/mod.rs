//! Whole-model passes and the pipeline that runs them.

use crate::config::PassConfig;
use crate::errors::PassError;
use crate::ir::model::GotoModel;
use anyhow::Context;
use bitflags::bitflags;
use std::path::Path;
use tracing::{debug, debug_span};

pub mod analysis;
pub mod devirtualization;
pub mod passes;
pub mod whole_program_analysis;

pub use devirtualization::{
    remove_virtual_functions, remove_virtual_functions_in, DevirtualizationPass,
    VirtualCallRemover,
};
pub use passes::{
    prune, remove_unused_functions, UnusedFunctionEliminationPass, UnusedFunctionStats,
};
pub use whole_program_analysis::WholeProgramAnalysis;

bitflags! {
    /// What a model contains, used to skip passes with nothing to do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModelFeatures: u8 {
        const HAS_FUNCTION_CALLS = 1 << 0;
        const HAS_VIRTUAL_CALLS = 1 << 1;
        const HAS_CLASSES = 1 << 2;
    }
}

impl ModelFeatures {
    pub fn detect(model: &GotoModel) -> Self {
        let mut features = ModelFeatures::empty();

        let symbol_table = &model.symbol_table;
        if symbol_table
            .iter()
            .any(|symbol| symbol_table.is_aggregate_type(symbol.name))
        {
            features |= ModelFeatures::HAS_CLASSES;
        }

        let calls = model
            .goto_functions
            .iter()
            .flat_map(|(_, function)| function.body.iter())
            .filter_map(|instruction| instruction.function_call());
        for call in calls {
            features |= ModelFeatures::HAS_FUNCTION_CALLS;
            if call.is_virtual() {
                features |= ModelFeatures::HAS_VIRTUAL_CALLS;
                break;
            }
        }

        features
    }
}

/// A transformation over a whole model.
pub trait GotoPass {
    fn name(&self) -> &'static str;

    /// Features the model must have for the pass to do anything.
    fn required_features(&self) -> ModelFeatures {
        ModelFeatures::empty()
    }

    /// Run the pass; returns whether the model changed.
    fn run(&mut self, model: &mut GotoModel) -> Result<bool, PassError>;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Runs devirtualization and then unused function elimination, as enabled
/// by the configuration.
pub struct Optimizer {
    config: PassConfig,
    passes: Vec<Box<dyn GotoPass>>,
}

impl Optimizer {
    pub fn new(config: PassConfig) -> Self {
        let mut passes: Vec<Box<dyn GotoPass>> = Vec::new();
        if config.devirtualize {
            passes.push(Box::new(DevirtualizationPass::new(&config)));
        }
        if config.remove_unused_functions {
            passes.push(Box::new(UnusedFunctionEliminationPass::new(&config)));
        }
        Self { config, passes }
    }

    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let config = PassConfig::load(path)
            .with_context(|| format!("failed to load optimizer config {}", path.display()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every configured pass over `model`; returns whether any changed it.
    pub fn optimize(&mut self, model: &mut GotoModel) -> Result<bool, PassError> {
        self.config.validate()?;
        let analysis = WholeProgramAnalysis::build(&model.symbol_table, &self.config);
        let mut changed = false;

        for pass in &mut self.passes {
            if let Some(devirtualization) =
                pass.as_any_mut().downcast_mut::<DevirtualizationPass>()
            {
                devirtualization.set_class_hierarchy(analysis.class_hierarchy.clone());
            }

            let name = pass.name();
            let features = ModelFeatures::detect(model);
            if !features.contains(pass.required_features()) {
                debug!(pass = name, ?features, "skipping pass");
                continue;
            }

            let _span = debug_span!("pass", name).entered();
            let pass_changed = pass.run(model)?;
            debug!(changed = pass_changed, "pass finished");
            changed |= pass_changed;
        }

        Ok(changed)
    }
}
