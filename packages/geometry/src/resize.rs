use serde::{Deserialize, Serialize};

use crate::coords::{MapDimensions, PstBounds};

/// The eight compass resize handles of a selected region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomRight
                | ResizeHandle::BottomLeft
        )
    }

    fn touches_left(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    fn touches_right(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    fn touches_top(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    fn touches_bottom(&self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }
}

/// Size limits applied after the handle math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeConstraints {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl ResizeConstraints {
    pub fn new(min_width: f64, min_height: f64, max_width: f64, max_height: f64) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }
}

impl Default for ResizeConstraints {
    fn default() -> Self {
        Self {
            min_width: 1.0,
            min_height: 1.0,
            max_width: f64::MAX,
            max_height: f64::MAX,
        }
    }
}

/// Keyboard modifiers held during a resize drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeModifiers {
    /// Apply deltas symmetrically around a fixed center (doubles the total
    /// size change). Edge handles still change only their own dimension.
    pub resize_from_center: bool,
    /// Keep the original aspect ratio. Corner handles only; the dimension
    /// with the smaller drag delta is recomputed from the other.
    pub maintain_aspect_ratio: bool,
}

/// Resize `original` by dragging `handle` by `(delta_x, delta_y)` pixels.
///
/// Order of operations: handle deltas, then modifier adjustment, then size
/// clamping to `constraints` and the map area, then position clamping into
/// `[0, mapWidth] x [0, mapHeight]`. The anchor (the opposite edge/corner,
/// or the center under `resize_from_center`) stays fixed through size
/// clamping.
pub fn resize_bounds(
    original: &PstBounds,
    handle: ResizeHandle,
    delta_x: f64,
    delta_y: f64,
    constraints: &ResizeConstraints,
    dims: &MapDimensions,
    modifiers: ResizeModifiers,
) -> PstBounds {
    let horizontal = handle.touches_left() || handle.touches_right();
    let vertical = handle.touches_top() || handle.touches_bottom();
    let scale = if modifiers.resize_from_center { 2.0 } else { 1.0 };

    let mut width = original.width;
    let mut height = original.height;

    if horizontal {
        let dw = if handle.touches_left() {
            -delta_x
        } else {
            delta_x
        };
        width += dw * scale;
    }
    if vertical {
        let dh = if handle.touches_top() { -delta_y } else { delta_y };
        height += dh * scale;
    }

    // Aspect lock applies to corner handles only; edge handles keep their
    // untouched dimension as-is.
    if modifiers.maintain_aspect_ratio && handle.is_corner() && original.height > 0.0 {
        let aspect = original.width / original.height;
        if delta_x.abs() >= delta_y.abs() {
            height = width / aspect;
        } else {
            width = height * aspect;
        }
    }

    width = width
        .min(constraints.max_width)
        .max(constraints.min_width)
        .min(dims.width);
    height = height
        .min(constraints.max_height)
        .max(constraints.min_height)
        .min(dims.height);

    let (center_x, center_y) = original.center();
    let right = original.x + original.width;
    let bottom = original.y + original.height;

    let mut x = if !horizontal {
        original.x
    } else if modifiers.resize_from_center {
        center_x - width / 2.0
    } else if handle.touches_left() {
        right - width
    } else {
        original.x
    };

    let mut y = if !vertical {
        original.y
    } else if modifiers.resize_from_center {
        center_y - height / 2.0
    } else if handle.touches_top() {
        bottom - height
    } else {
        original.y
    };

    x = x.clamp(0.0, (dims.width - width).max(0.0));
    y = y.clamp(0.0, (dims.height - height).max(0.0));

    PstBounds {
        x,
        y,
        width,
        height,
    }
}
