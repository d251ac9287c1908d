//! The nine categories a point can carry and the decoding of a network's
//! output vector into a display colour.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Gray,
    White,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Black,
        Category::Red,
        Category::Green,
        Category::Blue,
        Category::Yellow,
        Category::Cyan,
        Category::Magenta,
        Category::Gray,
        Category::White,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Category> {
        Category::ALL.get(i).copied()
    }

    /// Fill colour of a planted dot.
    pub fn rgb(self) -> Rgb {
        match self {
            Category::Black => Rgb(0, 0, 0),
            Category::Red => Rgb(255, 0, 0),
            Category::Green => Rgb(0, 255, 0),
            Category::Blue => Rgb(0, 0, 255),
            Category::Yellow => Rgb(255, 255, 0),
            Category::Cyan => Rgb(0, 255, 255),
            Category::Magenta => Rgb(255, 0, 255),
            Category::Gray => Rgb(128, 128, 128),
            Category::White => Rgb(255, 255, 255),
        }
    }

    /// Ring drawn around a dot so it stands out from the field beneath.
    pub fn border(self) -> Rgb {
        match self {
            Category::White | Category::Yellow | Category::Cyan | Category::Gray => Rgb(0, 0, 0),
            _ => Rgb(255, 255, 255),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `0xRRGGBB`
    pub fn packed(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

fn channel(v: f64) -> u8 {
    (v.min(1.) * 255.) as u8
}

/// Blends the nine category activations into one colour.
///
/// Every category is measured against black: its strength is how much it
/// exceeds the black output, never negative, with gray counting half. Red,
/// green and blue then sum the categories that contain them and saturate at
/// full intensity.
pub fn decode(outputs: ArrayView1<f64>) -> Result<Rgb> {
    if outputs.len() != Category::ALL.len() {
        return Err(NetworkError::DimensionMismatch {
            what: "outputs",
            expected: Category::ALL.len(),
            got: outputs.len(),
        });
    }

    let black = outputs[Category::Black.index()];
    let over = |c: Category| (outputs[c.index()] - black).max(0.);

    let white = over(Category::White);
    let gray = over(Category::Gray) * 0.5;
    let (red, green, blue) = (over(Category::Red), over(Category::Green), over(Category::Blue));
    let (yellow, cyan, magenta) = (
        over(Category::Yellow),
        over(Category::Cyan),
        over(Category::Magenta),
    );

    Ok(Rgb(
        channel(white + gray + red + yellow + magenta),
        channel(white + gray + green + yellow + cyan),
        channel(white + gray + blue + magenta + cyan),
    ))
}
