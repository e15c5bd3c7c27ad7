use kurbo::Affine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

/// A closed interval. `min` may be greater than `max`, which is how flipped
/// screen-space axes are described.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub fn union(&self, other: Bounds) -> Bounds {
    Bounds { x: self.x.union(other.x), y: self.y.union(other.y) }
  }

  /// Maps data coordinates inside `self` onto `viewport`.
  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl Range {
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  /// The smallest range covering every value, skipping NaNs. `None` when
  /// there are no values.
  pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values.into_iter().filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
      None => Some(Range::new(v, v)),
      Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
    })
  }

  pub const fn expand(self, amount: f64) -> Self {
    Range {
      min: self.min - amount * self.size().signum(),
      max: self.max + amount * self.size().signum(),
    }
  }
  pub const fn expand_by(self, fract: f64) -> Self { self.expand(self.size() * fract) }

  /// Adds a margin of `fract` on each side. A single-valued range gets a
  /// fixed half-unit margin so it can still be mapped onto a viewport.
  pub fn with_margin(self, fract: f64) -> Self {
    if self.size() == 0.0 { self.expand(0.5) } else { self.expand_by(fract) }
  }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  pub fn union(&self, other: Range) -> Range {
    Range { min: self.min.min(other.min), max: self.max.max(other.max) }
  }

  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = (self.max - self.min) / f64::from(count);
    if !(step.is_finite() && step > 0.0) {
      return NiceTicksIter::new(0.0, 0.0, 0.0, 0, 0);
    }

    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min / step).floor() * step;
    let hi = (self.max / step).ceil() * step;

    let precision = (-k as i32 + 4).max(0) as usize;
    let exponent = if nice_base == 10.0 { k + 1.0 } else { k };
    let mut decimals = (-exponent).max(0.0) as usize;
    if nice_base == 2.5 && exponent < 1.0 {
      decimals += 1;
    }
    NiceTicksIter::new(lo, hi, step, precision, decimals)
  }
}

pub struct NiceTicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
  decimals:  usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize, decimals: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, precision, decimals }
  }

  /// Number of decimals needed to print a tick label.
  pub fn decimals(&self) -> usize { self.decimals }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.step > 0.0 && self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use kurbo::Point;

  use super::*;

  #[test]
  fn nice_ticks_round_steps() {
    let iter = Range::new(0.0, 100.0).nice_ticks(10);
    assert_eq!(iter.decimals(), 0);
    assert_eq!(iter.collect::<Vec<_>>(), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
  }

  #[test]
  fn nice_ticks_cover_range() {
    let range = Range::new(-0.07, 1.07);
    let iter = range.nice_ticks(10);
    assert_eq!(iter.decimals(), 1);
    let ticks = iter.collect::<Vec<_>>();

    assert!(ticks.first().copied().unwrap() <= range.min);
    assert!(ticks.last().copied().unwrap() >= range.max);
    let step = ticks[1] - ticks[0];
    for pair in ticks.windows(2) {
      assert!((pair[1] - pair[0] - step).abs() < 1e-9);
    }
  }

  #[test]
  fn index_axis_has_integer_labels() {
    let iter = Range::new(0.0, 9.0).with_margin(0.05).nice_ticks(10);
    assert_eq!(iter.decimals(), 0);
  }

  #[test]
  fn empty_range_has_no_ticks() {
    assert_eq!(Range::new(1.0, 1.0).nice_ticks(10).count(), 0);
  }

  #[test]
  fn from_values_skips_nan() {
    let range = Range::from_values([0.5, f64::NAN, 0.1, 0.9]).unwrap();
    assert_eq!(range, Range::new(0.1, 0.9));
    assert_eq!(Range::from_values([]), None);
  }

  #[test]
  fn margin_on_single_value() {
    assert_eq!(Range::new(2.0, 2.0).with_margin(0.05), Range::new(1.5, 2.5));
    assert_eq!(Range::new(0.0, 10.0).with_margin(0.1), Range::new(-1.0, 11.0));
  }

  #[test]
  fn transform_maps_corners() {
    let data = Bounds::new(Range::new(0.0, 10.0), Range::new(0.0, 1.0));
    let viewport = Bounds::new(Range::new(100.0, 600.0), Range::new(400.0, 0.0));
    let transform = data.transform_to(viewport);

    let origin = transform * Point::new(0.0, 0.0);
    let corner = transform * Point::new(10.0, 1.0);
    assert!((origin.x - 100.0).abs() < 1e-9 && (origin.y - 400.0).abs() < 1e-9);
    assert!((corner.x - 600.0).abs() < 1e-9 && corner.y.abs() < 1e-9);
  }
}
