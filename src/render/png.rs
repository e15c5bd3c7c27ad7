use std::{path::Path, sync::mpsc};

use tracing::{debug, info};
use vello::wgpu;

use crate::{
  error::{Error, Result},
  render::{GpuHandle, RenderConfig},
};

/// Copies the rendered texture back from the GPU and encodes it as a PNG.
pub fn save(handle: &GpuHandle, config: &RenderConfig, path: &Path) -> Result<()> {
  let unpadded_bytes_per_row = 4 * config.width;
  let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
    * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_bytes_per_row) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded_bytes_per_row),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let buffer_slice = buffer.slice(..);
  let (tx, rx) = mpsc::channel();
  buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = tx.send(result);
  });
  handle
    .device
    .poll(wgpu::PollType::Wait)
    .map_err(|e| Error::Render(format!("failed to wait for the GPU: {e}")))?;
  rx.recv()
    .map_err(|e| Error::Render(format!("buffer mapping was dropped: {e}")))?
    .map_err(|e| Error::Render(format!("failed to map output buffer: {e}")))?;

  let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * config.height) as usize);
  {
    let data = buffer_slice.get_mapped_range();
    for row in data.chunks(padded_bytes_per_row as usize) {
      pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
    }
  }
  buffer.unmap();
  debug!(bytes = pixels.len(), "read back texture");

  let image = ::image::RgbaImage::from_raw(config.width, config.height, pixels)
    .ok_or_else(|| Error::Render("texture size does not match the image".to_string()))?;
  image.save(path)?;

  info!("wrote {}", path.display());
  Ok(())
}
