//! Textures, texture views and samplers.

use crate::descriptor::TextureViewDescriptor;
use crate::error::Result;
use crate::ffi::{self, *};
use crate::marshal::Marshal;
use crate::region::Region;
use crate::resource::define_resource;
use crate::types::{TextureDimension, TextureFormat, TextureUsage};

define_resource!(
    /// A multi-dimensional image.
    Texture,
    WGPUTexture
);

define_resource!(
    /// A view of a subset of a texture's mip levels, layers and aspects.
    TextureView,
    WGPUTextureView
);

define_resource!(
    /// Filtering and addressing state for texture sampling.
    Sampler,
    WGPUSampler
);

impl Texture {
    /// Create a view of this texture (whole texture for `None`).
    pub fn create_view(&self, desc: Option<&TextureViewDescriptor<'_>>) -> Result<TextureView> {
        let raw = self.raw()?;
        let create = entry!(self.library().procs(), texture_create_view)?;

        let region = Region::call();
        let native: *const WGPUTextureViewDescriptor = match desc {
            Some(desc) => desc.marshal(&region)?,
            None => std::ptr::null(),
        };
        let view = unsafe { create(raw, native) };
        region.close();

        let view = ffi::check_handle("wgpuTextureCreateView", view, WGPUTextureView::is_null)?;
        unsafe { TextureView::from_raw(self.library().clone(), view) }
    }

    /// Width of mip level 0, in texels.
    pub fn width(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_width = entry!(self.library().procs(), texture_get_width)?;
        Ok(unsafe { get_width(raw) })
    }

    /// Height of mip level 0, in texels.
    pub fn height(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_height = entry!(self.library().procs(), texture_get_height)?;
        Ok(unsafe { get_height(raw) })
    }

    /// Depth of a 3D texture, or the number of array layers otherwise.
    pub fn depth_or_array_layers(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_layers = entry!(self.library().procs(), texture_get_depth_or_array_layers)?;
        Ok(unsafe { get_layers(raw) })
    }

    /// Number of mip levels, including level 0.
    pub fn mip_level_count(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_count = entry!(self.library().procs(), texture_get_mip_level_count)?;
        Ok(unsafe { get_count(raw) })
    }

    /// Samples per texel; greater than 1 for multisampled textures.
    pub fn sample_count(&self) -> Result<u32> {
        let raw = self.raw()?;
        let get_count = entry!(self.library().procs(), texture_get_sample_count)?;
        Ok(unsafe { get_count(raw) })
    }

    /// 1D, 2D or 3D.
    pub fn dimension(&self) -> Result<TextureDimension> {
        let raw = self.raw()?;
        let get_dimension = entry!(self.library().procs(), texture_get_dimension)?;
        TextureDimension::try_from(unsafe { get_dimension(raw) })
    }

    /// Texel format. Fails with
    /// [`Error::UnexpectedValue`](crate::Error::UnexpectedValue) for formats
    /// this crate does not name.
    pub fn format(&self) -> Result<TextureFormat> {
        let raw = self.raw()?;
        let get_format = entry!(self.library().procs(), texture_get_format)?;
        TextureFormat::try_from(unsafe { get_format(raw) })
    }

    /// Usage the texture was created with.
    pub fn usage(&self) -> Result<TextureUsage> {
        let raw = self.raw()?;
        let get_usage = entry!(self.library().procs(), texture_get_usage)?;
        Ok(TextureUsage::from_bits_retain(unsafe { get_usage(raw) }))
    }

    /// Free the texture's GPU memory. The handle still needs closing.
    pub fn destroy(&self) -> Result<()> {
        let raw = self.raw()?;
        let destroy = entry!(self.library().procs(), texture_destroy)?;
        unsafe { destroy(raw) };
        Ok(())
    }
}
