use crate::backend::{Backend, CommandEncoder};
use crate::classifier::ArgumentInfo;
use crate::error::BindingError;
use crate::reflection::ArgumentKind;

/// Binds a root as a whole: a buffer, bytes copied into its slot, or a threadgroup
/// memory length.
pub struct ArgumentBinder<'a, B: Backend> {
    argument: ArgumentInfo,
    commands: &'a mut dyn CommandEncoder<B>,
}

impl<'a, B: Backend> ArgumentBinder<'a, B> {
    pub fn new(argument: ArgumentInfo, commands: &'a mut dyn CommandEncoder<B>) -> Self {
        Self { argument, commands }
    }

    pub fn argument(&self) -> &ArgumentInfo {
        &self.argument
    }

    pub fn bind_buffer(&mut self, buffer: &B::Buffer, offset: usize) -> Result<(), BindingError> {
        self.expect_kind(ArgumentKind::Buffer, "bind_buffer")?;
        self.commands.set_buffer(buffer, offset, self.argument.index);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BindingError> {
        self.expect_kind(ArgumentKind::Buffer, "write_bytes")?;
        self.commands.set_bytes(bytes, self.argument.index);
        Ok(())
    }

    pub fn set_threadgroup_memory_length(&mut self, length: usize) -> Result<(), BindingError> {
        self.expect_kind(
            ArgumentKind::ThreadgroupMemory,
            "set_threadgroup_memory_length",
        )?;
        self.commands
            .set_threadgroup_memory_length(length, self.argument.index);
        Ok(())
    }

    fn expect_kind(&self, kind: ArgumentKind, operation: &'static str) -> Result<(), BindingError> {
        if self.argument.kind != kind {
            return Err(BindingError::UnsupportedOperation {
                operation,
                binder: match self.argument.kind {
                    ArgumentKind::ThreadgroupMemory => "threadgroup memory",
                    _ => "buffer argument",
                },
            });
        }

        Ok(())
    }
}
