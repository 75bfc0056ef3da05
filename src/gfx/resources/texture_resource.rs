//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the
//! depth buffer, 2D textures decoded from image files, and the skybox cube map.

use std::path::{Path, PathBuf};

use crate::error::{FathomError, Result};

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// A single texel of `color`.
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: color.to_vec(),
        }
    }
}

/// Decodes an image file to RGBA8, optionally flipping it vertically so the
/// first row is the bottom of the image.
pub fn decode_rgba(path: &Path, flip_vertically: bool) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| FathomError::Texture {
        path: path.to_path_buf(),
        source,
    })?;
    let image = if flip_vertically { image.flipv() } else { image };
    let rgba = image.to_rgba8();
    Ok(RgbaImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Decodes the six cube faces. Faces that differ in size from the first are
/// resized to match it.
pub fn decode_cube_faces(faces: &[PathBuf; 6]) -> Result<Vec<RgbaImage>> {
    let mut decoded: Vec<RgbaImage> = Vec::with_capacity(6);
    for path in faces {
        let mut face = decode_rgba(path, false)?;
        if let Some(first) = decoded.first() {
            if (face.width, face.height) != (first.width, first.height) {
                log::warn!(
                    "Skybox face '{}' is {}x{}, resizing to {}x{}",
                    path.display(),
                    face.width,
                    face.height,
                    first.width,
                    first.height
                );
                face = resize(face, first.width, first.height);
            }
        }
        decoded.push(face);
    }
    Ok(decoded)
}

fn resize(face: RgbaImage, width: u32, height: u32) -> RgbaImage {
    match image::RgbaImage::from_raw(face.width, face.height, face.pixels) {
        Some(buffer) => {
            let resized =
                image::imageops::resize(&buffer, width, height, image::imageops::FilterType::Triangle);
            RgbaImage {
                width,
                height,
                pixels: resized.into_raw(),
            }
        }
        None => RgbaImage {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        },
    }
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads decoded pixels as a repeating, linearly filtered 2D texture.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_layer(queue, &texture, image, 0);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads a 2D texture from `path`, flipped vertically. A missing or
    /// undecodable file yields a single `fallback` texel instead.
    pub fn load_or_fallback(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: Option<&Path>,
        format: wgpu::TextureFormat,
        fallback: [u8; 4],
    ) -> Self {
        let image = match path.map(|path| decode_rgba(path, true)) {
            Some(Ok(image)) => {
                log::debug!("Decoded texture {}x{}", image.width, image.height);
                image
            }
            Some(Err(err)) => {
                log::warn!("{err}; using a fallback texel");
                RgbaImage::solid(fallback)
            }
            None => RgbaImage::solid(fallback),
        };
        let label = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "fallback texture".to_string());
        Self::from_rgba(device, queue, &image, format, &label)
    }

    /// Uploads six equally sized faces in +x, -x, +y, -y, +z, -z order.
    pub fn cube_map(device: &wgpu::Device, queue: &wgpu::Queue, faces: &[RgbaImage]) -> Self {
        let (width, height) = faces
            .first()
            .map(|face| (face.width, face.height))
            .unwrap_or((1, 1));

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cube Map"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.iter().take(6).enumerate() {
            write_layer(queue, &texture, face, layer as u32);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cube View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads the skybox faces, or a uniform dark-blue cube if any face fails.
    pub fn load_cube_or_fallback(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[PathBuf; 6],
    ) -> Self {
        let decoded = decode_cube_faces(faces).unwrap_or_else(|err| {
            log::warn!("{err}; using a fallback skybox");
            vec![RgbaImage::solid([10, 30, 60, 255]); 6]
        });
        Self::cube_map(device, queue, &decoded)
    }
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, image: &RgbaImage, layer: u32) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}
