use super::*;
use crate::address::resolve_slot_index;
use crate::classifier::ArgumentInfo;
use crate::paths::PathToken;

/// Slot of a texture or sampler root addressed by a local path such as `[2]`.
fn root_slot(
    encoding: &Encoding<'_>,
    argument: &ArgumentInfo,
    path: &SymbolicPath,
    expected: &'static str,
    is_expected: fn(&BindingCategory) -> bool,
) -> Result<(usize, usize), BindingError> {
    let local = encoding.local_category_sequence(path)?;
    let category = destination(path, local)?;
    expect_category(path, category, expected, is_expected)?;

    let mut tokens = vec![PathToken::Named(argument.name.clone())];
    tokens.extend_from_slice(path.tokens());
    let slot = resolve_slot_index(&tokens, local)?;

    Ok((slot, slot - argument.index))
}

pub struct TextureBinder<'a, B: Backend> {
    encoding: Encoding<'a>,
    argument: ArgumentInfo,
    commands: &'a mut dyn CommandEncoder<B>,
}

impl<'a, B: Backend> TextureBinder<'a, B> {
    pub fn new(
        encoding: Encoding<'a>,
        argument: ArgumentInfo,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Self {
        Self {
            encoding,
            argument,
            commands,
        }
    }

    pub fn bind_texture(&mut self, texture: &B::Texture) -> Result<(), BindingError> {
        if self.argument.array_length != 1 {
            return Err(BindingError::RequiresArrayReference(
                self.argument.name.clone(),
            ));
        }

        self.commands.set_texture(texture, self.argument.index);
        Ok(())
    }

    pub fn bind_textures(&mut self, textures: &[B::Texture]) -> Result<(), BindingError> {
        check_range(0, textures.len(), self.argument.array_length)?;

        let start = self.argument.index;
        self.commands
            .set_textures(textures, start..start + textures.len());
        Ok(())
    }

    pub fn bind_texture_at(
        &mut self,
        path: &SymbolicPath,
        texture: &B::Texture,
    ) -> Result<(), BindingError> {
        let (slot, _) = self.slot(path)?;
        self.commands.set_texture(texture, slot);
        Ok(())
    }

    pub fn bind_textures_at(
        &mut self,
        path: &SymbolicPath,
        textures: &[B::Texture],
    ) -> Result<(), BindingError> {
        let (slot, element) = self.slot(path)?;
        check_range(element, textures.len(), self.argument.array_length)?;

        self.commands.set_textures(textures, slot..slot + textures.len());
        Ok(())
    }

    fn slot(&self, path: &SymbolicPath) -> Result<(usize, usize), BindingError> {
        root_slot(&self.encoding, &self.argument, path, "texture", |category| {
            matches!(category, BindingCategory::TextureArgument(_))
        })
    }
}

pub struct SamplerBinder<'a, B: Backend> {
    encoding: Encoding<'a>,
    argument: ArgumentInfo,
    commands: &'a mut dyn CommandEncoder<B>,
}

impl<'a, B: Backend> SamplerBinder<'a, B> {
    pub fn new(
        encoding: Encoding<'a>,
        argument: ArgumentInfo,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Self {
        Self {
            encoding,
            argument,
            commands,
        }
    }

    pub fn bind_sampler(
        &mut self,
        sampler: &B::Sampler,
        lod_clamp: Option<LodClamp>,
    ) -> Result<(), BindingError> {
        if self.argument.array_length != 1 {
            return Err(BindingError::RequiresArrayReference(
                self.argument.name.clone(),
            ));
        }

        self.commands
            .set_sampler(sampler, lod_clamp, self.argument.index);
        Ok(())
    }

    pub fn bind_samplers(
        &mut self,
        samplers: &[B::Sampler],
        lod_clamps: Option<&[LodClamp]>,
    ) -> Result<(), BindingError> {
        check_range(0, samplers.len(), self.argument.array_length)?;
        if let Some(lod_clamps) = lod_clamps {
            check_lengths(samplers.len(), lod_clamps.len())?;
        }

        let start = self.argument.index;
        self.commands
            .set_samplers(samplers, lod_clamps, start..start + samplers.len());
        Ok(())
    }

    pub fn bind_sampler_at(
        &mut self,
        path: &SymbolicPath,
        sampler: &B::Sampler,
    ) -> Result<(), BindingError> {
        let (slot, _) = self.slot(path)?;
        self.commands.set_sampler(sampler, None, slot);
        Ok(())
    }

    pub fn bind_samplers_at(
        &mut self,
        path: &SymbolicPath,
        samplers: &[B::Sampler],
    ) -> Result<(), BindingError> {
        let (slot, element) = self.slot(path)?;
        check_range(element, samplers.len(), self.argument.array_length)?;

        self.commands
            .set_samplers(samplers, None, slot..slot + samplers.len());
        Ok(())
    }

    fn slot(&self, path: &SymbolicPath) -> Result<(usize, usize), BindingError> {
        root_slot(&self.encoding, &self.argument, path, "sampler", |category| {
            matches!(category, BindingCategory::SamplerArgument(_))
        })
    }
}
