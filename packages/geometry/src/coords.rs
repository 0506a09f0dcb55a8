use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A PST region in normalized map space.
///
/// `maturity` runs left-to-right, `visibility` bottom-to-top. A well-formed
/// box has `maturity2 > maturity1` and `visibility1 > visibility2`
/// (top-left first). Inverted input is still convertible, since
/// [`to_bounds`] orients the rectangle, but fails [`validate_coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PstCoordinates {
    pub maturity1: f64,
    pub visibility1: f64,
    pub maturity2: f64,
    pub visibility2: f64,
}

impl PstCoordinates {
    pub fn new(maturity1: f64, visibility1: f64, maturity2: f64, visibility2: f64) -> Self {
        Self {
            maturity1,
            visibility1,
            maturity2,
            visibility2,
        }
    }
}

/// Pixel-space dual of [`PstCoordinates`]. Width and height are always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PstBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PstBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Pixel dimensions of the rendered map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDimensions {
    pub width: f64,
    pub height: f64,
}

impl MapDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("coordinate {name} = {value} is outside [0, 1]")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("box is inverted: maturity2 ({maturity2}) must exceed maturity1 ({maturity1})")]
    InvertedMaturity { maturity1: f64, maturity2: f64 },

    #[error("box is inverted: visibility1 ({visibility1}) must exceed visibility2 ({visibility2})")]
    InvertedVisibility { visibility1: f64, visibility2: f64 },
}

/// Convert normalized coordinates to a pixel rectangle.
///
/// The Y axis is inverted: higher visibility renders closer to the top of
/// the map, so `y = (1 - visibility) * height`. The top-left corner takes
/// the minimum of the two computed edges, so inverted input still yields a
/// correctly oriented, non-negative rectangle.
pub fn to_bounds(coords: &PstCoordinates, dims: &MapDimensions) -> PstBounds {
    let x1 = coords.maturity1 * dims.width;
    let x2 = coords.maturity2 * dims.width;
    let y1 = (1.0 - coords.visibility1) * dims.height;
    let y2 = (1.0 - coords.visibility2) * dims.height;

    PstBounds {
        x: x1.min(x2),
        y: y1.min(y2),
        width: (x2 - x1).abs(),
        height: (y2 - y1).abs(),
    }
}

/// Inverse of [`to_bounds`], clamped to `[0, 1]` on every component.
pub fn to_coordinates(bounds: &PstBounds, dims: &MapDimensions) -> PstCoordinates {
    let clamp01 = |v: f64| v.clamp(0.0, 1.0);

    PstCoordinates {
        maturity1: clamp01(bounds.x / dims.width),
        visibility1: clamp01(1.0 - bounds.y / dims.height),
        maturity2: clamp01((bounds.x + bounds.width) / dims.width),
        visibility2: clamp01(1.0 - (bounds.y + bounds.height) / dims.height),
    }
}

/// Check range and orientation. Conversion functions deliberately accept
/// inverted boxes; callers that need a well-formed box gate on this.
pub fn validate_coordinates(coords: &PstCoordinates) -> Result<(), CoordinateError> {
    let components = [
        ("maturity1", coords.maturity1),
        ("visibility1", coords.visibility1),
        ("maturity2", coords.maturity2),
        ("visibility2", coords.visibility2),
    ];
    for (name, value) in components {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoordinateError::OutOfRange { name, value });
        }
    }

    if coords.maturity2 <= coords.maturity1 {
        return Err(CoordinateError::InvertedMaturity {
            maturity1: coords.maturity1,
            maturity2: coords.maturity2,
        });
    }
    if coords.visibility1 <= coords.visibility2 {
        return Err(CoordinateError::InvertedVisibility {
            visibility1: coords.visibility1,
            visibility2: coords.visibility2,
        });
    }

    Ok(())
}

/// Clamp every component into `[0, 1]`, preserving orientation.
pub fn clamp_coordinates(coords: &PstCoordinates) -> PstCoordinates {
    PstCoordinates {
        maturity1: coords.maturity1.clamp(0.0, 1.0),
        visibility1: coords.visibility1.clamp(0.0, 1.0),
        maturity2: coords.maturity2.clamp(0.0, 1.0),
        visibility2: coords.visibility2.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: MapDimensions = MapDimensions {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn bounds_invert_y_axis() {
        // Top-left of the map: low maturity, high visibility.
        let coords = PstCoordinates::new(0.1, 0.9, 0.4, 0.6);
        let bounds = to_bounds(&coords, &DIMS);

        assert!((bounds.x - 80.0).abs() < 1e-9);
        assert!((bounds.y - 60.0).abs() < 1e-9);
        assert!((bounds.width - 240.0).abs() < 1e-9);
        assert!((bounds.height - 180.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_input_still_yields_oriented_box() {
        let coords = PstCoordinates::new(0.4, 0.6, 0.1, 0.9);
        let bounds = to_bounds(&coords, &DIMS);

        assert!(bounds.width >= 0.0);
        assert!(bounds.height >= 0.0);
        assert!((bounds.x - 80.0).abs() < 1e-9);
        assert!((bounds.y - 60.0).abs() < 1e-9);
        assert!(validate_coordinates(&coords).is_err());
    }

    #[test]
    fn round_trip_within_tolerance() {
        let cases = [
            PstCoordinates::new(0.0, 1.0, 1.0, 0.0),
            PstCoordinates::new(0.25, 0.75, 0.5, 0.5),
            PstCoordinates::new(0.33, 0.87, 0.91, 0.12),
        ];
        for coords in cases {
            let back = to_coordinates(&to_bounds(&coords, &DIMS), &DIMS);
            assert!((back.maturity1 - coords.maturity1).abs() < 1e-2);
            assert!((back.visibility1 - coords.visibility1).abs() < 1e-2);
            assert!((back.maturity2 - coords.maturity2).abs() < 1e-2);
            assert!((back.visibility2 - coords.visibility2).abs() < 1e-2);
        }
    }

    #[test]
    fn coordinates_clamped_to_unit_range() {
        let bounds = PstBounds::new(-40.0, -30.0, 1000.0, 700.0);
        let coords = to_coordinates(&bounds, &DIMS);

        assert!(coords.maturity1 >= 0.0 && coords.maturity1 <= 1.0);
        assert!(coords.visibility1 >= 0.0 && coords.visibility1 <= 1.0);
        assert!(coords.maturity2 >= 0.0 && coords.maturity2 <= 1.0);
        assert!(coords.visibility2 >= 0.0 && coords.visibility2 <= 1.0);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let coords = PstCoordinates::new(0.1, 1.2, 0.4, 0.2);
        assert!(matches!(
            validate_coordinates(&coords),
            Err(CoordinateError::OutOfRange {
                name: "visibility1",
                ..
            })
        ));
    }
}
