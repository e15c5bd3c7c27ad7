use kurbo::{Affine, BezPath, Stroke};
use peniko::Color;
use polars::prelude::*;

use crate::{axes::SeriesData, format::LineStyle, render::Render, theme::Palette};

pub struct LineAxes<'a> {
  pub(crate) data:    SeriesData<'a>,
  pub(crate) options: LineOptions,
  pub(crate) label:   Option<String>,
  cycle:              usize,
}

pub struct LineOptions {
  pub width: f64,
  /// Falls back to the plot's colour cycle.
  pub color: Option<Color>,
  pub style: LineStyle,
}

impl Default for LineOptions {
  fn default() -> Self { LineOptions { width: 1.5, color: None, style: LineStyle::Solid } }
}

impl<'a> LineAxes<'a> {
  pub(crate) fn new(data: SeriesData<'a>, cycle: usize) -> Self {
    LineAxes { data, options: LineOptions::default(), label: None, cycle }
  }

  pub fn color(&mut self, color: Color) -> &mut Self {
    self.options.color = Some(color);
    self
  }

  pub fn width(&mut self, width: f64) -> &mut Self {
    self.options.width = width;
    self
  }

  pub fn style(&mut self, style: LineStyle) -> &mut Self {
    self.options.style = style;
    self
  }

  pub fn label(&mut self, label: &str) -> &mut Self {
    self.label = Some(label.to_string());
    self
  }

  pub(crate) fn resolved_color(&self, palette: &Palette) -> Color {
    self.options.color.unwrap_or_else(|| palette.cycle(self.cycle))
  }

  pub(crate) fn stroke(&self) -> Stroke {
    let mut stroke = Stroke::new(self.options.width);
    if let Some(dash) = self.options.style.dashes() {
      stroke = stroke.with_dashes(0.0, dash.iter().map(|d| d * self.options.width));
    }
    stroke
  }

  pub(crate) fn draw(
    &self,
    render: &mut Render,
    transform: Affine,
    palette: &Palette,
  ) -> PolarsResult<()> {
    let mut shape = BezPath::new();
    let mut pen_down = false;

    for point in self.data.points()? {
      match point {
        Some(point) if pen_down => shape.line_to(transform * point),
        Some(point) => {
          shape.move_to(transform * point);
          pen_down = true;
        }
        None => pen_down = false,
      }
    }

    render.stroke(&shape, Affine::IDENTITY, self.resolved_color(palette), &self.stroke());
    Ok(())
  }
}
