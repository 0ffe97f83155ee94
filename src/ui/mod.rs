//! UI definitions module
//!
//! The face is a fixed set of slots, each showing one glyph from the
//! resource catalogue. Drawing goes through `embedded-graphics`, so the same
//! code paints the ST7789 panel on the watch and in-memory frames in tests.

mod casio_face;
mod icons;
pub mod layout;
pub mod mode;
pub mod resources;
mod slot;

pub use casio_face::CasioFace;
pub use icons::Icon;
pub use slot::DisplaySlot;
