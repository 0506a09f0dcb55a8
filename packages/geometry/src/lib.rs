//! Geometry for positioned map regions.
//!
//! Converts between normalized map coordinates (maturity/visibility in
//! `[0, 1]`) and pixel-space rectangles, and implements the resize-handle
//! math the designer surface drives. Used for PST attitude regions and
//! pipeline extents.
//!
//! All functions are pure; the rendering layer owns the pixel rectangles it
//! receives and never calls back in.

pub mod coords;
pub mod resize;

pub use coords::{
    clamp_coordinates, to_bounds, to_coordinates, validate_coordinates, CoordinateError,
    MapDimensions, PstBounds, PstCoordinates,
};
pub use resize::{resize_bounds, ResizeConstraints, ResizeHandle, ResizeModifiers};
