use std::path::Path;

use kurbo::{Affine, Point, Shape, Stroke};
use parley::{Alignment, FontWeight, Layout, PositionedLayoutItem, StyleProperty};
use peniko::{Brush, Color, Fill};
use tracing::debug;
use vello::wgpu::{self, TextureDescriptor};

use crate::{
  Plot,
  error::{Error, Result},
};

mod png;
mod window;

pub(crate) struct Render {
  pub scene:      vello::Scene,
  pub background: Color,
  font:           parley::FontContext,
  layout:         parley::LayoutContext<Brush>,
}

pub(crate) struct GpuHandle {
  pub device:  wgpu::Device,
  pub queue:   wgpu::Queue,
  pub texture: wgpu::Texture,
  pub view:    wgpu::TextureView,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Align {
  #[default]
  Start,
  Center,
  End,
}

pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub color:            Color,
  /// The anchor point, in scene coordinates.
  pub position:         Point,
  /// Applied around `position`, after alignment.
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             12.0,
      weight:           FontWeight::NORMAL,
      color:            Color::BLACK,
      position:         Point::ZERO,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

impl Plot<'_> {
  /// Renders the plot off-screen and writes it as a PNG.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let config = RenderConfig { width: self.width, height: self.height };
    let handle = GpuHandle::new(&config, None)?;

    let mut render = Render::new(self.style.background);
    self.draw(&mut render, config.width as f64, config.height as f64)?;
    render.render_to_texture(&handle, &config)?;

    png::save(&handle, &config, path.as_ref())
  }

  /// Opens a window showing the plot, and blocks until it is closed.
  pub fn show(&self) -> Result<()> { window::show(self) }
}

impl Render {
  pub fn new(background: Color) -> Self {
    Render {
      scene: vello::Scene::new(),
      background,
      font: parley::FontContext::new(),
      layout: parley::LayoutContext::new(),
    }
  }

  pub fn fill(&mut self, shape: &impl Shape, transform: Affine, color: Color) {
    self.scene.fill(Fill::NonZero, transform, color, None, shape);
  }

  pub fn stroke(&mut self, shape: &impl Shape, transform: Affine, color: Color, stroke: &Stroke) {
    self.scene.stroke(stroke, transform, color, None, shape);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);

    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(Brush::Solid(text.color)));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let offset = |align: Align, size: f32| match align {
      Align::Start => 0.0,
      Align::Center => -f64::from(size) / 2.0,
      Align::End => -f64::from(size),
    };
    let transform = Affine::translate(text.position.to_vec2())
      * text.transform
      * Affine::translate((
        offset(text.horizontal_align, layout.width()),
        offset(text.vertical_align, layout.height()),
      ));

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }

  pub(crate) fn render_to_texture(&self, handle: &GpuHandle, config: &RenderConfig) -> Result<()> {
    debug!(width = config.width, height = config.height, "rendering scene");

    let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .map_err(|e| Error::Render(format!("failed to create renderer: {e}")))?;

    renderer
      .render_to_texture(
        &handle.device,
        &handle.queue,
        &self.scene,
        &handle.view,
        &vello::RenderParams {
          base_color:          self.background,
          width:               config.width,
          height:              config.height,
          antialiasing_method: vello::AaConfig::Msaa16,
        },
      )
      .map_err(|e| Error::Render(format!("failed to render to a texture: {e}")))
  }
}

impl GpuHandle {
  pub fn new(config: &RenderConfig, adapter: Option<wgpu::Adapter>) -> Result<Self> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
          .map_err(|e| Error::Render(format!("failed to create adapter: {e}")))?
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))
    .map_err(|e| Error::Render(format!("failed to create device: {e}")))?;

    let texture = create_texture(&device, config);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    Ok(GpuHandle { device, queue, texture, view })
  }

  pub fn resize(&mut self, config: &RenderConfig) {
    self.texture = create_texture(&self.device, config);
    self.view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
  }
}

fn create_texture(device: &wgpu::Device, config: &RenderConfig) -> wgpu::Texture {
  device.create_texture(&TextureDescriptor {
    label:           Some("Render Texture"),
    size:            config.extent_3d(),
    mip_level_count: 1,
    sample_count:    1,
    dimension:       wgpu::TextureDimension::D2,
    format:          wgpu::TextureFormat::Rgba8Unorm,
    usage:           wgpu::TextureUsages::STORAGE_BINDING
      | wgpu::TextureUsages::TEXTURE_BINDING
      | wgpu::TextureUsages::COPY_SRC,
    view_formats:    &[],
  })
}

impl RenderConfig {
  pub fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }
}
