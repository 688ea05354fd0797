//! Layer colours
//!
//! Entry 0 is the transparent background. Layers take entries `1..len`
//! cyclically once there are more layers than colours.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }

    pub fn red(&self) -> u8 {
        self.0[0]
    }

    pub fn green(&self) -> u8 {
        self.0[1]
    }

    pub fn blue(&self) -> u8 {
        self.0[2]
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// Opaque colour with each channel inverted
    pub fn inverted(&self) -> Rgba {
        Rgba::new(255 - self.red(), 255 - self.green(), 255 - self.blue(), 255)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

const COLOURBLIND: [Rgba; 8] = [
    Rgba::new(230, 159, 0, 255),
    Rgba::new(86, 180, 233, 255),
    Rgba::new(0, 158, 115, 255),
    Rgba::new(240, 228, 66, 255),
    Rgba::new(0, 114, 178, 255),
    Rgba::new(213, 94, 0, 255),
    Rgba::new(204, 121, 167, 255),
    Rgba::new(0, 0, 0, 255),
];

/// Ordered colour table with a reserved background entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgba>", into = "Vec<Rgba>")]
pub struct Palette {
    entries: Vec<Rgba>,
}

impl Palette {
    /// Background plus at least one colour
    pub fn new(entries: Vec<Rgba>) -> Result<Self> {
        if entries.len() < 2 {
            return Err(RegionError::PaletteTooSmall(entries.len()));
        }
        Ok(Palette { entries })
    }

    /// Colour-blind-safe palette: 8 colours followed by the inverses of the first 7
    pub fn colourblind() -> Self {
        let mut entries = Vec::with_capacity(16);
        entries.push(Rgba::new(255, 255, 255, 0));
        entries.extend_from_slice(&COLOURBLIND);
        entries.extend(COLOURBLIND[..7].iter().map(Rgba::inverted));
        Palette { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a palette holds at least two entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn background(&self) -> Rgba {
        self.entries[0]
    }

    /// Colour at `index`, wrapping around the table
    pub fn get(&self, index: usize) -> Rgba {
        self.entries[index % self.entries.len()]
    }

    /// Number of distinct layer colours
    pub fn layer_colours(&self) -> usize {
        self.entries.len() - 1
    }

    /// Palette index of the layer at sort rank `rank`; never the background
    pub fn layer_index(&self, rank: usize) -> usize {
        1 + rank % self.layer_colours()
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }
}

impl TryFrom<Vec<Rgba>> for Palette {
    type Error = RegionError;

    fn try_from(entries: Vec<Rgba>) -> Result<Self> {
        Palette::new(entries)
    }
}

impl From<Palette> for Vec<Rgba> {
    fn from(palette: Palette) -> Self {
        palette.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::colourblind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colourblind_palette() {
        let p = Palette::colourblind();
        assert_eq!(p.len(), 16);
        assert_eq!(p.background().alpha(), 0);
        assert_eq!(p.get(1), Rgba::new(230, 159, 0, 255));
        assert_eq!(p.get(9), Rgba::new(25, 96, 255, 255));
        assert_eq!(p.get(15), Rgba::new(51, 134, 88, 255));
    }

    #[test]
    fn test_layer_index_skips_background() {
        let p = Palette::colourblind();
        assert_eq!(p.layer_index(0), 1);
        assert_eq!(p.layer_index(14), 15);
        assert_eq!(p.layer_index(15), 1);
        for rank in 0..100 {
            assert_ne!(p.layer_index(rank), 0);
        }
    }

    #[test]
    fn test_palette_too_small() {
        assert_eq!(
            Palette::new(vec![Rgba::new(0, 0, 0, 0)]).unwrap_err(),
            RegionError::PaletteTooSmall(1)
        );
        let p = Palette::new(vec![Rgba::new(0, 0, 0, 0), Rgba::new(1, 2, 3, 255)]).unwrap();
        assert_eq!(p.layer_index(5), 1);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Rgba::new(255, 0, 16, 255).to_string(), "#ff0010ff");
    }
}
