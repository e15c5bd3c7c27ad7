use std::sync::Arc;

use tracing::{debug, error, warn};
use vello::wgpu;

use crate::{
  Plot,
  error::{Error, Result},
  render::{GpuHandle, Render, RenderConfig},
};

pub fn show(plot: &Plot) -> Result<()> {
  let event_loop = winit::event_loop::EventLoop::new()
    .map_err(|e| Error::Render(format!("failed to create event loop: {e}")))?;
  event_loop.set_control_flow(winit::event_loop::ControlFlow::Wait);

  let mut app = App { plot, stale: true, render: None, init: None, error: None };
  event_loop
    .run_app(&mut app)
    .map_err(|e| Error::Render(format!("event loop failed: {e}")))?;

  let result = match app.error.take() {
    Some(e) => Err(e),
    None => Ok(()),
  };

  // FIXME: Ideally, we'd drop this. But dropping it segfaults.
  std::mem::forget(app);

  result
}

struct App<'a> {
  plot:   &'a Plot<'a>,
  stale:  bool,
  render: Option<Render>,

  init:  Option<Init>,
  error: Option<Error>,
}

struct Init {
  window:  Arc<winit::window::Window>,
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
}

impl App<'_> {
  fn fail(&mut self, event_loop: &winit::event_loop::ActiveEventLoop, e: Error) {
    error!("{e}");
    self.error = Some(e);
    event_loop.exit();
  }

  fn init(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) -> Result<Init> {
    let window = event_loop
      .create_window(
        winit::window::Window::default_attributes()
          .with_title(self.plot.title.as_deref().unwrap_or("rgbplot"))
          .with_inner_size(winit::dpi::PhysicalSize::new(self.plot.width, self.plot.height))
          .with_min_inner_size(winit::dpi::LogicalSize::new(100, 100)),
      )
      .map_err(|e| Error::Render(format!("failed to create window: {e}")))?;
    let window = Arc::new(window);
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance
      .create_surface(window.clone())
      .map_err(|e| Error::Render(format!("failed to create surface: {e}")))?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))
    .map_err(|e| Error::Render(format!("failed to create adapter: {e}")))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| f.is_srgb())
      .or_else(|| surface_caps.formats.first().copied())
      .ok_or_else(|| Error::Render("surface has no supported formats".to_string()))?;
    let alpha_mode = surface_caps
      .alpha_modes
      .first()
      .copied()
      .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let render_config = RenderConfig { width: size.width.max(1), height: size.height.max(1) };
    let handle = GpuHandle::new(&render_config, Some(adapter))?;

    let config = wgpu::SurfaceConfiguration {
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
      format: surface_format,
      width: render_config.width,
      height: render_config.height,
      present_mode: wgpu::PresentMode::AutoNoVsync,
      alpha_mode,
      view_formats: vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .map_err(|e| Error::Render(format!("failed to create renderer: {e}")))?;

    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { window, surface, config, handle, blit, vello })
  }

  fn redraw(&mut self) -> Result<()> {
    let Some(init) = &mut self.init else { return Ok(()) };

    if self.render.is_none() || self.stale {
      self.stale = false;
      let render = self.render.get_or_insert_with(|| Render::new(self.plot.style.background));
      render.scene.reset();
      self.plot.draw(render, f64::from(init.config.width), f64::from(init.config.height))?;

      debug!(width = init.config.width, height = init.config.height, "redrawing plot");
      init
        .vello
        .render_to_texture(
          &init.handle.device,
          &init.handle.queue,
          &render.scene,
          &init.handle.view,
          &vello::RenderParams {
            base_color:          render.background,
            width:               init.config.width,
            height:              init.config.height,
            antialiasing_method: vello::AaConfig::Msaa16,
          },
        )
        .map_err(|e| Error::Render(format!("failed to render to a texture: {e}")))?;
    }

    init.present();
    Ok(())
  }
}

impl winit::application::ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match self.init(event_loop) {
      Ok(init) => {
        init.window.request_redraw();
        self.init = Some(init);
      }
      Err(e) => self.fail(event_loop, e),
    }
  }

  fn window_event(
    &mut self,
    event_loop: &winit::event_loop::ActiveEventLoop,
    _: winit::window::WindowId,
    event: winit::event::WindowEvent,
  ) {
    match event {
      winit::event::WindowEvent::CloseRequested => {
        event_loop.exit();
      }

      winit::event::WindowEvent::KeyboardInput {
        event: winit::event::KeyEvent { logical_key: winit::keyboard::Key::Character(c), .. },
        ..
      } if c == "q" => {
        event_loop.exit();
      }

      winit::event::WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init {
          if new_size.width > 0 && new_size.height > 0 {
            init.config.width = new_size.width;
            init.config.height = new_size.height;
            init
              .handle
              .resize(&RenderConfig { width: init.config.width, height: init.config.height });
            init.surface.configure(&init.handle.device, &init.config);

            self.stale = true;
            init.window.request_redraw();
          }
        }
      }

      winit::event::WindowEvent::RedrawRequested => {
        if let Err(e) = self.redraw() {
          self.fail(event_loop, e);
        }
      }

      _ => (),
    }
  }
}

impl Init {
  fn present(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost) => {
        self.surface.configure(&self.handle.device, &self.config);
        return;
      }
      Err(e) => {
        warn!("dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, &surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    frame.present();
  }
}
