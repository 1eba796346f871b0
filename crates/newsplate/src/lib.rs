//! The portable core of the newsplate editor: the highlight markup language,
//! the HTML escaping it relies on, and the card template shared between the
//! browser package and tests.

pub mod error;
pub mod escape;
pub mod markup;
pub mod template;

pub use error::{ErrKind, Error};
pub use markup::render_markup;
pub use template::{CardTemplate, Highlight};
