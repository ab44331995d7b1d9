//! Square patrol path animation.
//!
//! A shape walks down, right, up and left, turning whenever its centroid
//! crosses the boundary for the current direction. On every turn the shape
//! is rebuilt around its centroid, rotated to face the new direction.
use std::f32::consts::FRAC_PI_2;

use crate::{error::GeometryError, vertex::Vertex};

pub const DEFAULT_SPEED: f32 = 0.005;
pub const DEFAULT_BOUNDARY: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Right,
    Up,
    Left,
}

impl Direction {
    pub fn next(self) -> Self {
        match self {
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
        }
    }

    /// Unit vector of travel.
    pub fn unit(self) -> glm::Vec2 {
        match self {
            Direction::Down => glm::vec2(0.0, -1.0),
            Direction::Right => glm::vec2(1.0, 0.0),
            Direction::Up => glm::vec2(0.0, 1.0),
            Direction::Left => glm::vec2(-1.0, 0.0),
        }
    }

    /// Counter-clockwise rotation from the `Down` orientation.
    pub fn angle(self) -> f32 {
        match self {
            Direction::Down => 0.0,
            Direction::Right => FRAC_PI_2,
            Direction::Up => 2.0 * FRAC_PI_2,
            Direction::Left => 3.0 * FRAC_PI_2,
        }
    }
}

/// Where the patrol turns, in normalized device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatrolBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for PatrolBounds {
    fn default() -> Self {
        Self {
            min: -DEFAULT_BOUNDARY,
            max: DEFAULT_BOUNDARY,
        }
    }
}

impl PatrolBounds {
    /// Has `centroid` reached the edge that ends a leg heading `direction`?
    pub fn crossed(&self, direction: Direction, centroid: glm::Vec2) -> bool {
        match direction {
            Direction::Down => centroid.y <= self.min,
            Direction::Right => centroid.x >= self.max,
            Direction::Up => centroid.y >= self.max,
            Direction::Left => centroid.x <= self.min,
        }
    }
}

/// Average of the vertex positions, in the xy plane.
pub fn centroid(vertices: &[Vertex]) -> glm::Vec2 {
    if vertices.is_empty() {
        return glm::Vec2::zeros();
    }
    let sum = vertices
        .iter()
        .fold(glm::Vec2::zeros(), |acc, vertex| acc + vertex.pos.xy());
    sum / vertices.len() as f32
}

#[derive(Clone, Debug)]
pub struct Patrol {
    direction: Direction,
    speed: f32,
    step: glm::Vec2,
    bounds: PatrolBounds,
    /// Per-vertex offset from the centroid, in the `Down` orientation.
    offsets: Vec<glm::Vec2>,
}

impl Patrol {
    /// Start patrolling with `vertices` as the shape, currently facing `start`.
    pub fn new(
        vertices: &[Vertex],
        start: Direction,
        speed: f32,
        bounds: PatrolBounds,
    ) -> Result<Self, GeometryError> {
        if vertices.is_empty() {
            return Err(GeometryError::Empty);
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(GeometryError::InvalidSpeed(speed));
        }
        let center = centroid(vertices);
        let offsets = vertices
            .iter()
            .map(|vertex| glm::rotate_vec2(&(vertex.pos.xy() - center), -start.angle()))
            .collect();
        Ok(Self {
            direction: start,
            speed,
            step: start.unit() * speed,
            bounds,
            offsets,
        })
    }

    /// Patrol the default square, starting downwards.
    pub fn with_defaults(vertices: &[Vertex]) -> Result<Self, GeometryError> {
        Self::new(
            vertices,
            Direction::Down,
            DEFAULT_SPEED,
            PatrolBounds::default(),
        )
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Per-frame displacement. Exactly one component is non-zero.
    pub fn step(&self) -> glm::Vec2 {
        self.step
    }

    pub fn bounds(&self) -> PatrolBounds {
        self.bounds
    }

    /// Move one frame. Returns the new direction when the shape turned.
    ///
    /// `vertices` must be the shape this patrol was created with.
    pub fn advance(&mut self, vertices: &mut [Vertex]) -> Option<Direction> {
        debug_assert_eq!(vertices.len(), self.offsets.len());
        for vertex in vertices.iter_mut() {
            vertex.pos.x += self.step.x;
            vertex.pos.y += self.step.y;
        }

        let center = centroid(vertices);
        if !self.bounds.crossed(self.direction, center) {
            return None;
        }

        self.direction = self.direction.next();
        self.step = self.direction.unit() * self.speed;
        let angle = self.direction.angle();
        for (vertex, offset) in vertices.iter_mut().zip(&self.offsets) {
            let rotated = glm::rotate_vec2(offset, angle);
            vertex.pos.x = center.x + rotated.x;
            vertex.pos.y = center.y + rotated.y;
        }
        Some(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    /// The triangle from the colored shapes demo, pointing down.
    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::colored([-0.7, 0.55, 0.0], [1.0, 0.0, 0.0]),
            Vertex::colored([-0.45, 0.99, 0.0], [0.0, 1.0, 0.0]),
            Vertex::colored([-0.95, 0.99, 0.0], [0.0, 0.0, 1.0]),
        ]
    }

    fn non_zero_axes(step: glm::Vec2) -> usize {
        [step.x, step.y].iter().filter(|v| **v != 0.0).count()
    }

    fn extent(vertices: &[Vertex]) -> glm::Vec2 {
        let xs = vertices.iter().map(|v| v.pos.x);
        let ys = vertices.iter().map(|v| v.pos.y);
        let w = xs.clone().fold(f32::MIN, f32::max) - xs.fold(f32::MAX, f32::min);
        let h = ys.clone().fold(f32::MIN, f32::max) - ys.fold(f32::MAX, f32::min);
        glm::vec2(w, h)
    }

    #[test]
    fn direction_cycle() {
        let mut direction = Direction::Down;
        let mut seen = vec![];
        for _ in 0..4 {
            direction = direction.next();
            seen.push(direction);
        }
        assert_eq!(
            seen,
            vec![
                Direction::Right,
                Direction::Up,
                Direction::Left,
                Direction::Down
            ]
        );
    }

    #[test]
    fn rotating_down_unit_gives_each_direction() {
        for direction in [
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Left,
        ] {
            let rotated = glm::rotate_vec2(&Direction::Down.unit(), direction.angle());
            assert!((rotated - direction.unit()).norm() < EPS, "{direction:?}");
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Patrol::with_defaults(&[]).unwrap_err(),
            GeometryError::Empty
        );
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Patrol::new(&triangle(), Direction::Down, speed, PatrolBounds::default()),
                Err(GeometryError::InvalidSpeed(_))
            ));
        }
    }

    #[test]
    fn exactly_one_axis_moves_at_all_times() {
        let mut shape = triangle();
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        assert_eq!(non_zero_axes(patrol.step()), 1);
        for _ in 0..5_000 {
            patrol.advance(&mut shape);
            assert_eq!(non_zero_axes(patrol.step()), 1);
            let unit = patrol.direction().unit();
            assert_eq!(patrol.step(), unit * DEFAULT_SPEED);
        }
    }

    #[test]
    fn turns_only_when_boundary_crossed() {
        let mut shape = triangle();
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        let bounds = patrol.bounds();
        let loose = PatrolBounds {
            min: bounds.min + EPS,
            max: bounds.max - EPS,
        };
        let mut turns = 0;
        for _ in 0..5_000 {
            let before = patrol.direction();
            let moved_center = centroid(&shape) + patrol.step();
            match patrol.advance(&mut shape) {
                Some(after) => {
                    turns += 1;
                    assert_eq!(after, before.next());
                    assert!(loose.crossed(before, moved_center));
                    // re-orientation keeps the centroid in place
                    assert!((centroid(&shape) - moved_center).norm() < EPS);
                }
                None => {
                    assert_eq!(patrol.direction(), before);
                    assert!(!bounds.crossed(before, centroid(&shape)));
                }
            }
        }
        assert!(turns >= 4, "only {turns} turns");
    }

    #[test]
    fn first_leg_goes_down_then_right() {
        let mut shape = triangle();
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        let mut frames = 0;
        let turned = loop {
            frames += 1;
            if let Some(direction) = patrol.advance(&mut shape) {
                break direction;
            }
            assert!(frames < 10_000, "never turned");
        };
        assert_eq!(turned, Direction::Right);
        let center = centroid(&shape);
        assert!(center.y <= -DEFAULT_BOUNDARY);
        assert!(center.y > -DEFAULT_BOUNDARY - DEFAULT_SPEED - EPS);
        // ~1.5433 units at 0.005 per frame
        assert!((300..=320).contains(&frames), "{frames} frames");
    }

    #[test]
    fn vertex_count_is_preserved() {
        let mut shape = triangle();
        let original_len = shape.len();
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        for _ in 0..2_000 {
            patrol.advance(&mut shape);
            assert_eq!(shape.len(), original_len);
        }
    }

    #[test]
    fn turning_rotates_the_shape() {
        let mut shape = triangle();
        let start_extent = extent(&shape);
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        while patrol.advance(&mut shape).is_none() {}
        assert_eq!(patrol.direction(), Direction::Right);

        // width and height swap when facing sideways
        let turned_extent = extent(&shape);
        assert!((turned_extent.x - start_extent.y).abs() < EPS);
        assert!((turned_extent.y - start_extent.x).abs() < EPS);

        // the tip (vertex 0) now points right of the centroid
        let center = centroid(&shape);
        let tip = shape[0].pos.xy() - center;
        assert!(tip.x > 0.0 && tip.y.abs() < EPS);
    }

    #[test]
    fn uvs_and_colors_ride_along() {
        let mut shape: Vec<Vertex> = [[0.5, 0.5], [0.5, -0.5], [-0.5, -0.5], [-0.5, 0.5]]
            .iter()
            .zip([[1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0]])
            .map(|(p, uv)| Vertex::new([p[0] * 0.2, p[1] * 0.2, 0.0], [1.0, 1.0, 1.0], uv))
            .collect();
        let before: Vec<_> = shape.iter().map(|v| (v.color, v.uv)).collect();
        let mut patrol = Patrol::with_defaults(&shape).unwrap();
        for _ in 0..3_000 {
            patrol.advance(&mut shape);
        }
        let after: Vec<_> = shape.iter().map(|v| (v.color, v.uv)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn starting_in_another_direction() {
        let mut shape = triangle();
        let mut patrol =
            Patrol::new(&shape, Direction::Left, 0.01, PatrolBounds::default()).unwrap();
        assert_eq!(patrol.step(), glm::vec2(-0.01, 0.0));
        // centroid x is already -0.7, so the first step crosses the left edge
        assert_eq!(patrol.advance(&mut shape), Some(Direction::Down));
        assert_eq!(patrol.step(), glm::vec2(0.0, -0.01));
    }
}
