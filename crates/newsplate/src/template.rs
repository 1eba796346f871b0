use serde::{Deserialize, Serialize};

/// Fixed geometry and export parameters of a news card.
///
/// The card is laid out at a fixed CSS pixel size and rasterized at
/// [`Self::pixel_ratio`], so the exported PNG has the same dimensions on
/// every device regardless of viewport scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Layout width of the card in CSS pixels.
    pub width: u32,
    /// Layout height of the card in CSS pixels.
    pub height: u32,
    /// Color filled behind transparent regions of the card.
    pub background_color: String,
    /// Ratio of raster pixels to CSS pixels in the exported image.
    pub pixel_ratio: f32,
    /// File name suggested for the downloaded image.
    pub file_name: String,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1350,
            background_color: "#ffffff".to_string(),
            pixel_ratio: 2.,
            file_name: "news-template.png".to_string(),
        }
    }
}

/// A highlight color of the markup language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Yellow,
    Red,
    Blue,
}

impl Highlight {
    /// All highlights, in the order their passes run.
    pub const ALL: [Highlight; 3] = [Highlight::Yellow, Highlight::Red, Highlight::Blue];

    /// The class attached to the emitted `span`.
    pub fn class_name(self) -> &'static str {
        match self {
            Highlight::Yellow => "hl-yellow",
            Highlight::Red => "hl-red",
            Highlight::Blue => "hl-blue",
        }
    }

    /// The opening and closing delimiters recognized in raw text.
    pub fn tokens(self) -> (&'static str, &'static str) {
        match self {
            Highlight::Yellow => ("[[", "]]"),
            Highlight::Red => ("{r:", "}"),
            Highlight::Blue => ("{b:", "}"),
        }
    }
}
