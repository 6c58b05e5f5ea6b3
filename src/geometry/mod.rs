//! Board geometry: the "contain" fit of the image inside its container,
//! pointer-to-percent mapping, note scaling and the drag gesture.
//!
//! Note positions are percentages of the fitted image box, so they survive
//! any container size.

mod fit;
mod gesture;
mod layout;
mod scale;

pub use fit::*;
pub use gesture::*;
pub use layout::*;
pub use scale::*;
