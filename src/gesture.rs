//! Turns a pointer press into the category of the point it plants.

use serde::{Deserialize, Serialize};

use crate::palette::Category;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Middle,
    Right,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
}

/// Exactly one modifier held picks one of six categories, any other left or
/// right press falls back to blue or red. Anything else plants white.
pub fn classify(button: Button, modifiers: Modifiers) -> Category {
    match (button, modifiers) {
        (Button::Left, Modifiers::SHIFT) => Category::Green,
        (Button::Right, Modifiers::SHIFT) => Category::Black,
        (Button::Left, Modifiers::ALT) => Category::Yellow,
        (Button::Right, Modifiers::ALT) => Category::Cyan,
        (Button::Left, Modifiers::CTRL) => Category::Magenta,
        (Button::Right, Modifiers::CTRL) => Category::Gray,
        (Button::Left, _) => Category::Blue,
        (Button::Right, _) => Category::Red,
        (Button::Middle, _) => Category::White,
    }
}
