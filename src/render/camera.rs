use serde::{Deserialize, Serialize};

/// A 2D coordinate, in untransformed layout units or in screen units
/// depending on which side of the camera it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Pan offset plus zoom scale, applied uniformly to the whole rendered
/// forest. The layout always computes full, untransformed coordinates; the
/// camera only affects final presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Point,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Map a layout-space point to screen space.
    pub fn project(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    /// Map a screen-space point back to layout space.
    pub fn unproject(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Rescale so the world point currently under `pointer` stays under it.
    /// The offset is recomputed as
    /// `pointer - (pointer - offset) * (new_scale / old_scale)`.
    pub fn zoom_toward(&mut self, pointer: Point, new_scale: f64) {
        let ratio = new_scale / self.scale;
        self.offset.x = pointer.x - (pointer.x - self.offset.x) * ratio;
        self.offset.y = pointer.y - (pointer.y - self.offset.y) * ratio;
        self.scale = new_scale;
    }
}
