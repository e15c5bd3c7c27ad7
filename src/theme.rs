use peniko::Color;

/// Colours and decorations shared by every part of a plot.
#[derive(Clone, Copy, Debug)]
pub struct Style {
  pub background:      Color,
  pub axes_background: Color,
  pub text:            Color,
  /// Grid lines drawn on every tick, behind the data.
  pub grid:            Option<Color>,
  /// Left and bottom axis lines.
  pub spines:          Option<Color>,
  pub ticks:           Color,
  pub palette:         Palette,
}

/// A repeating list of series colours.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
  colors: &'static [Color],
}

/// matplotlib's default colour cycle, "tab10". seaborn's `set_style` leaves
/// it in place.
pub const TAB10: Palette = Palette::new(&[
  Color::from_rgb8(0x1f, 0x77, 0xb4),
  Color::from_rgb8(0xff, 0x7f, 0x0e),
  Color::from_rgb8(0x2c, 0xa0, 0x2c),
  Color::from_rgb8(0xd6, 0x27, 0x28),
  Color::from_rgb8(0x94, 0x67, 0xbd),
  Color::from_rgb8(0x8c, 0x56, 0x4b),
  Color::from_rgb8(0xe3, 0x77, 0xc2),
  Color::from_rgb8(0x7f, 0x7f, 0x7f),
  Color::from_rgb8(0xbc, 0xbd, 0x22),
  Color::from_rgb8(0x17, 0xbe, 0xcf),
]);

impl Style {
  pub const DARKGRID: Style = Style {
    background:      Color::WHITE,
    axes_background: Color::from_rgb8(234, 234, 242),
    text:            Color::from_rgb8(32, 32, 32),
    grid:            Some(Color::WHITE),
    spines:          None,
    ticks:           Color::from_rgb8(32, 32, 32),
    palette:         TAB10,
  };

  pub const WHITE: Style = Style {
    background:      Color::WHITE,
    axes_background: Color::WHITE,
    text:            Color::from_rgb8(32, 32, 32),
    grid:            None,
    spines:          Some(Color::from_rgb8(128, 128, 128)),
    ticks:           Color::from_rgb8(128, 128, 128),
    palette:         TAB10,
  };
}

impl Default for Style {
  fn default() -> Self { Style::DARKGRID }
}

impl Palette {
  pub const fn new(colors: &'static [Color]) -> Self { Palette { colors } }

  /// The `index`th colour, wrapping around.
  pub fn cycle(&self, index: usize) -> Color {
    if self.colors.is_empty() { Color::BLACK } else { self.colors[index % self.colors.len()] }
  }

  pub fn len(&self) -> usize { self.colors.len() }
  pub fn is_empty(&self) -> bool { self.colors.is_empty() }
}
