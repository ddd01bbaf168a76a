//! Collision detection between cars
//!
//! Cars are axis-aligned boxes; the only test needed is rectangle overlap.

use glam::Vec2;

use super::state::Vehicle;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: rectangles that only share an edge don't collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Index of the first opponent whose box overlaps the player's
pub fn first_overlap(player: &Vehicle, opponents: &[Vehicle]) -> Option<usize> {
    let player_rect = player.rect();
    opponents
        .iter()
        .position(|opp| player_rect.overlaps(&opp.rect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = rect(0.0, 0.0, 60.0, 100.0);
        assert!(a.overlaps(&rect(30.0, 50.0, 60.0, 100.0)));
        assert!(a.overlaps(&a));
        // Containment
        assert!(a.overlaps(&rect(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_dont_overlap() {
        let a = rect(0.0, 0.0, 60.0, 100.0);
        assert!(!a.overlaps(&rect(60.0, 0.0, 60.0, 100.0)));
        assert!(!a.overlaps(&rect(0.0, 100.0, 60.0, 100.0)));
        assert!(!a.overlaps(&rect(0.0, -100.0, 60.0, 100.0)));
    }

    #[test]
    fn test_separated() {
        let a = rect(0.0, 0.0, 60.0, 100.0);
        assert!(!a.overlaps(&rect(150.0, 0.0, 60.0, 100.0)));
        assert!(!a.overlaps(&rect(0.0, 300.0, 60.0, 100.0)));
    }
}
