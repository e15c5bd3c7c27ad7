use kurbo::Affine;
use peniko::Color;
use polars::prelude::*;

use crate::{axes::SeriesData, marker::Marker, render::Render, theme::Palette};

pub struct ScatterAxes<'a> {
  pub(crate) data:    SeriesData<'a>,
  pub(crate) options: ScatterOptions,
  pub(crate) label:   Option<String>,
  cycle:              usize,
}

pub struct ScatterOptions {
  /// Marker width in pixels.
  pub size:   f64,
  pub color:  Option<Color>,
  pub marker: Marker,
}

impl Default for ScatterOptions {
  fn default() -> Self { ScatterOptions { size: 8.0, color: None, marker: Marker::Circle } }
}

impl<'a> ScatterAxes<'a> {
  pub(crate) fn new(data: SeriesData<'a>, cycle: usize) -> Self {
    ScatterAxes { data, options: ScatterOptions::default(), label: None, cycle }
  }

  pub fn color(&mut self, color: Color) -> &mut Self {
    self.options.color = Some(color);
    self
  }

  pub fn size(&mut self, size: f64) -> &mut Self {
    self.options.size = size;
    self
  }

  pub fn marker(&mut self, marker: Marker) -> &mut Self {
    self.options.marker = marker;
    self
  }

  pub fn label(&mut self, label: &str) -> &mut Self {
    self.label = Some(label.to_string());
    self
  }

  pub(crate) fn resolved_color(&self, palette: &Palette) -> Color {
    self.options.color.unwrap_or_else(|| palette.cycle(self.cycle))
  }

  pub(crate) fn draw(
    &self,
    render: &mut Render,
    transform: Affine,
    palette: &Palette,
  ) -> PolarsResult<()> {
    let color = self.resolved_color(palette);
    let marker = self.options.marker.to_path(0.1 / self.options.size);

    for point in self.data.points()?.into_iter().flatten() {
      let center = transform * point;
      let placement = Affine::translate(center.to_vec2()) * Affine::scale(self.options.size);
      render.fill(&marker, placement, color);
    }

    Ok(())
  }
}
