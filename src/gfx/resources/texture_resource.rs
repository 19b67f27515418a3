//! Depth buffer, sampled color maps and [`TextureImage`], the decoded pixels texture loaders hand over.

/// Decoded RGBA8 pixels waiting to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Returns `None` if `rgba` is not exactly `width * height * 4` bytes
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (width > 0 && height > 0 && rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A single opaque pixel of the given color
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

fn allocate_2d(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Depth attachment sized to the surface
pub struct DepthBuffer {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let (texture, view) = allocate_2d(
            device,
            "Depth Buffer",
            config.width,
            config.height,
            Self::FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Sampled sRGB color map with its repeat sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Uploads `image`; flat outlines carry UVs outside `[0, 1]`, hence repeat addressing
    pub fn create_from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        label: &str,
    ) -> Self {
        let (texture, view) = allocate_2d(
            device,
            label,
            image.width,
            image.height,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        queue.write_texture(
            texture.as_image_copy(),
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: None,
            },
            texture.size(),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 1x1 white map bound when a material has no texture
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create_from_image(device, queue, &TextureImage::solid([255; 4]), "White Texture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_must_match_pixels() {
        assert!(TextureImage::new(2, 2, vec![0; 16]).is_some());
        assert!(TextureImage::new(2, 2, vec![0; 15]).is_none());
        assert!(TextureImage::new(0, 0, Vec::new()).is_none());
        assert_eq!(TextureImage::solid([1, 2, 3, 4]).rgba, vec![1, 2, 3, 4]);
    }
}
