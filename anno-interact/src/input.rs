use glam::Vec3;

use crate::ray::Ray;

/// Edge-triggered press events for one input button, derived once per
/// frame from the raw pressed state. Components consume these instead
/// of keeping their own was-pressed-last-frame flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonEdges {
    pub press_start: bool,
    pub press_end: bool,
    pub held: bool,
}

#[derive(Debug, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, down: bool) -> ButtonEdges {
        let edges = ButtonEdges {
            press_start: down && !self.was_down,
            press_end: !down && self.was_down,
            held: down,
        };
        self.was_down = down;
        edges
    }
}

/// One frame of pointer state handed to the interaction engines: the
/// marker position in world space plus the pointing ray it came from.
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub position: Vec3,
    pub ray: Ray,
}
