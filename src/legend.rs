use kurbo::{Affine, Line, Point, Rect, RoundedRect, Size, Stroke, Vec2};
use parley::Layout;
use peniko::{Brush, Color};

use crate::{
  Axes, Bounds, Plot,
  marker::Marker,
  render::{Align, DrawText, Render},
};

/// Where the legend box goes relative to the axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendPosition {
  /// Inside the axes, in the upper right corner.
  UpperRight,
  /// Right of the axes, its upper left corner level with the top of the
  /// axes. The axes shrink to make room.
  Outside,
}

pub(crate) struct LegendItem {
  pub label: String,
  color:     Color,
  line:      Option<Stroke>,
  marker:    Option<Marker>,
}

pub(crate) struct LegendLayout {
  items:    Vec<(LegendItem, Layout<Brush>)>,
  pub size: Size,
}

const PADDING: f64 = 8.0;
const FONT_SIZE: f32 = 14.0;
const LINE_HEIGHT: f64 = 20.0;
const MARKER_WIDTH: f64 = 36.0;
/// Gap between the axes and an outside legend, matplotlib's `borderaxespad=1`
/// at this font size.
pub(crate) const BORDER_AXES_PAD: f64 = FONT_SIZE as f64;

impl Plot<'_> {
  pub(crate) fn legend_items(&self) -> Vec<LegendItem> {
    let palette = self.style.palette;
    let mut items = vec![];
    for ax in &self.axes {
      match ax {
        Axes::Line(la) => {
          if let Some(label) = &la.label {
            items.push(LegendItem {
              label:  label.clone(),
              color:  la.resolved_color(&palette),
              line:   Some(la.stroke()),
              marker: None,
            });
          }
        }
        Axes::Scatter(sa) => {
          if let Some(label) = &sa.label {
            items.push(LegendItem {
              label:  label.clone(),
              color:  sa.resolved_color(&palette),
              line:   None,
              marker: Some(sa.options.marker),
            });
          }
        }
      }
    }
    items
  }

  /// Lays out the legend text, or `None` when no series has a label.
  pub(crate) fn layout_legend(&self, render: &mut Render) -> Option<LegendLayout> {
    let items = self.legend_items();
    if items.is_empty() {
      return None;
    }

    let mut inner_width = 0.0_f64;
    let mut laid_out = vec![];
    for item in items {
      let layout = render.layout_text(&DrawText {
        text: &item.label,
        size: FONT_SIZE,
        color: self.style.text,
        ..Default::default()
      });
      inner_width = inner_width.max(f64::from(layout.width()));
      laid_out.push((item, layout));
    }

    let size = Size::new(
      inner_width + MARKER_WIDTH + PADDING * 2.0,
      laid_out.len() as f64 * LINE_HEIGHT + PADDING * 2.0,
    );
    Some(LegendLayout { items: laid_out, size })
  }

  pub(crate) fn draw_legend(
    &self,
    render: &mut Render,
    legend: LegendLayout,
    position: LegendPosition,
    viewport: Bounds,
  ) {
    // The viewport's y axis is flipped, so `y.max` is the top edge.
    let origin = match position {
      LegendPosition::Outside => Point::new(viewport.x.max + BORDER_AXES_PAD, viewport.y.max),
      LegendPosition::UpperRight => Point::new(
        viewport.x.max - legend.size.width - BORDER_AXES_PAD,
        viewport.y.max + BORDER_AXES_PAD,
      ),
    };
    let rect = Rect::from_origin_size(origin, legend.size);

    let background = RoundedRect::from_rect(rect, 4.0);
    render.fill(&background, Affine::IDENTITY, Color::from_rgba8(255, 255, 255, 200));
    render.stroke(
      &background,
      Affine::IDENTITY,
      Color::from_rgb8(204, 204, 204),
      &Stroke::new(1.0),
    );

    for (i, (item, layout)) in legend.items.into_iter().enumerate() {
      let pos = Point::new(
        rect.x0 + PADDING,
        rect.y0 + PADDING + i as f64 * LINE_HEIGHT + LINE_HEIGHT / 2.0,
      );
      let sample_end = pos + Vec2::new(MARKER_WIDTH - 8.0, 0.0);

      if let Some(stroke) = &item.line {
        render.stroke(&Line::new(pos, sample_end), Affine::IDENTITY, item.color, stroke);
      }
      if let Some(marker) = item.marker {
        let center = pos.midpoint(sample_end);
        render.fill(
          &marker.to_path(0.01),
          Affine::translate(center.to_vec2()) * Affine::scale(8.0),
          item.color,
        );
      }

      render.draw_text_layout(layout, DrawText {
        text: &item.label,
        size: FONT_SIZE,
        color: self.style.text,
        position: pos + Vec2::new(MARKER_WIDTH, 0.0),
        vertical_align: Align::Center,
        ..Default::default()
      });
    }
  }
}
