//! Clear-color model.
//!
//! Heterogeneous color inputs (channel lists, `#rgb` / `#rrggbb` strings) are
//! normalized into one [`ClearColor`] representation.

pub mod color;

pub use color::{normalize, ChannelValue, ClearColor, ColorInput, DEFAULT_CLEAR_COLOR};
