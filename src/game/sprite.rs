//! Segment orientation lookup for drawing the snake
//!
//! Each segment's look depends only on its neighbours, so the lookup is a
//! pure function from (incoming, outgoing) unit vectors to a shape.

use super::action::Direction;
use super::state::{GameState, Position};

/// Shape of a middle segment, named after the two sides it connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyShape {
    Vertical,
    Horizontal,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentSprite {
    /// Head, facing the direction of travel
    Head(Direction),
    /// Tail, pointing away from the body
    Tail(Direction),
    Body(BodyShape),
}

/// Unit step from `from` to `to`, undoing wraparound across grid edges
fn unit_step(from: Position, to: Position) -> (i32, i32) {
    fn axis(delta: i32) -> i32 {
        match delta {
            0 => 0,
            // Neighbours one cell apart, or across a wrapped edge
            d if d.abs() == 1 => d,
            d => -d.signum(),
        }
    }
    (axis(to.x - from.x), axis(to.y - from.y))
}

/// Shape of a middle segment keyed by (incoming, outgoing) vectors
///
/// `incoming` is current minus previous (toward the tail),
/// `outgoing` is next minus current.
pub fn body_shape(incoming: (i32, i32), outgoing: (i32, i32)) -> BodyShape {
    match (incoming, outgoing) {
        ((0, _), (0, _)) => BodyShape::Vertical,
        ((_, 0), (_, 0)) => BodyShape::Horizontal,
        ((1, 0), (0, -1)) | ((0, 1), (-1, 0)) => BodyShape::TopLeft,
        ((1, 0), (0, 1)) | ((0, -1), (-1, 0)) => BodyShape::BottomLeft,
        ((-1, 0), (0, -1)) | ((0, 1), (1, 0)) => BodyShape::TopRight,
        ((-1, 0), (0, 1)) | ((0, -1), (1, 0)) => BodyShape::BottomRight,
        _ => BodyShape::Vertical,
    }
}

/// Sprite for every segment, head first
pub fn segment_sprites(state: &GameState) -> Vec<SegmentSprite> {
    let body = &state.snake.body;
    let last = body.len().saturating_sub(1);

    body.iter()
        .enumerate()
        .map(|(i, &current)| {
            if i == 0 {
                SegmentSprite::Head(state.snake.direction)
            } else if i == last {
                let (dx, dy) = unit_step(body[i - 1], current);
                SegmentSprite::Tail(Direction::from_delta(dx, dy).unwrap_or(Direction::Down))
            } else {
                let incoming = unit_step(body[i - 1], current);
                let outgoing = unit_step(current, body[i + 1]);
                SegmentSprite::Body(body_shape(incoming, outgoing))
            }
        })
        .collect()
}
