/// A flat 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel by `k`, clamped to `[0, 1]`, truncating towards zero.
    ///
    /// Used for flat lighting: `k = 1` keeps the colour, `k = 0` yields black.
    pub fn scaled(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        let channel = |c: u8| (c as f32 * k) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 3]> for Colour {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(c: Colour) -> Self {
        image::Rgba([c.r, c.g, c.b, 255])
    }
}
