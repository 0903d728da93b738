use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour of a book tab, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabColor {
    Red,
    Orange,
    LightGreen,
    Green,
    LightBlue,
    Blue,
    Purple,
    Black,
    Gold,
}

impl TabColor {
    pub fn name(&self) -> &'static str {
        match self {
            TabColor::Red => "red",
            TabColor::Orange => "orange",
            TabColor::LightGreen => "lightgreen",
            TabColor::Green => "green",
            TabColor::LightBlue => "lightblue",
            TabColor::Blue => "blue",
            TabColor::Purple => "purple",
            TabColor::Black => "black",
            TabColor::Gold => "gold",
        }
    }
}

impl fmt::Display for TabColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
