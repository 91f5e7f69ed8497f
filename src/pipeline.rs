//! Per-function binding state for compute and render pipelines.

use log::*;

use crate::backend::{Backend, CommandEncoder};
use crate::binder::{RootBinder, make_root_binder};
use crate::encoder_group::{EncoderGroup, GroupLayout};
use crate::error::BindingError;
use crate::path_index::PathIndex;
use crate::reflection::{FunctionStage, ReflectedFunction};

/// A compiled function together with the path index built from its reflection.
pub struct FunctionBindings<B: Backend> {
    function: B::Function,
    name: String,
    stage: FunctionStage,
    path_index: PathIndex,
    layout: GroupLayout,
}

impl<B: Backend> FunctionBindings<B> {
    pub fn new(function: B::Function, reflected: &ReflectedFunction) -> Result<Self, BindingError> {
        let path_index = PathIndex::new(&reflected.arguments)?;
        debug!(
            "function '{}' ({:?}): {} indexed paths",
            reflected.name,
            reflected.stage,
            path_index.len()
        );

        Ok(Self {
            function,
            name: reflected.name.clone(),
            stage: reflected.stage,
            path_index,
            layout: GroupLayout::new(&reflected.arguments),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> FunctionStage {
        self.stage
    }

    pub fn function(&self) -> &B::Function {
        &self.function
    }

    pub fn path_index(&self) -> &PathIndex {
        &self.path_index
    }

    /// binder for the root argument `root`, encoding into `commands`
    pub fn make_binder<'a>(
        &'a self,
        root: &str,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Result<RootBinder<'a, B>, BindingError> {
        let encoding = self.path_index.encoding(root)?;
        make_root_binder(encoding, &self.function, commands)
    }

    pub fn make_encoder_group(&self) -> EncoderGroup<B> {
        EncoderGroup::new(self.layout.clone())
    }
}

fn expect_stage(
    reflected: &ReflectedFunction,
    expected: FunctionStage,
) -> Result<(), BindingError> {
    if reflected.stage != expected {
        return Err(BindingError::WrongStage {
            function: reflected.name.clone(),
            expected,
            found: reflected.stage,
        });
    }

    Ok(())
}

pub struct ComputeBindings<B: Backend> {
    kernel: FunctionBindings<B>,
}

impl<B: Backend> ComputeBindings<B> {
    pub fn new(function: B::Function, reflected: &ReflectedFunction) -> Result<Self, BindingError> {
        expect_stage(reflected, FunctionStage::Compute)?;
        let kernel = FunctionBindings::new(function, reflected)?;

        Ok(Self { kernel })
    }

    pub fn kernel(&self) -> &FunctionBindings<B> {
        &self.kernel
    }

    pub fn make_binder<'a>(
        &'a self,
        root: &str,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Result<RootBinder<'a, B>, BindingError> {
        self.kernel.make_binder(root, commands)
    }

    pub fn make_encoder_group(&self) -> EncoderGroup<B> {
        self.kernel.make_encoder_group()
    }
}

/// Vertex and fragment bindings of a render pipeline. Either stage may be absent.
pub struct RenderBindings<B: Backend> {
    vertex: Option<FunctionBindings<B>>,
    fragment: Option<FunctionBindings<B>>,
}

impl<B: Backend> RenderBindings<B> {
    pub fn new(
        vertex: Option<(B::Function, &ReflectedFunction)>,
        fragment: Option<(B::Function, &ReflectedFunction)>,
    ) -> Result<Self, BindingError> {
        let vertex = vertex
            .map(|(function, reflected)| {
                expect_stage(reflected, FunctionStage::Vertex)?;
                FunctionBindings::new(function, reflected)
            })
            .transpose()?;
        let fragment = fragment
            .map(|(function, reflected)| {
                expect_stage(reflected, FunctionStage::Fragment)?;
                FunctionBindings::new(function, reflected)
            })
            .transpose()?;

        Ok(Self { vertex, fragment })
    }

    pub fn stage(&self, stage: FunctionStage) -> Result<&FunctionBindings<B>, BindingError> {
        let bindings = match stage {
            FunctionStage::Vertex => self.vertex.as_ref(),
            FunctionStage::Fragment => self.fragment.as_ref(),
            FunctionStage::Compute => None,
        };

        bindings.ok_or(BindingError::NoFunctionForStage(stage))
    }

    pub fn make_vertex_binder<'a>(
        &'a self,
        root: &str,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Result<RootBinder<'a, B>, BindingError> {
        self.stage(FunctionStage::Vertex)?
            .make_binder(root, commands)
    }

    pub fn make_fragment_binder<'a>(
        &'a self,
        root: &str,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Result<RootBinder<'a, B>, BindingError> {
        self.stage(FunctionStage::Fragment)?
            .make_binder(root, commands)
    }
}
