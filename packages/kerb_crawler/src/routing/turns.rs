//! Turn classification and scoring. Collection vehicles strongly prefer to
//! keep turning right, so when there is a choice of streets the circuit
//! builder takes the one with the lowest score as calculated here.

use crate::common::config::TurnPenalties;
use crate::common::geometry::turn_angle;

/// Turns up to this many degrees either way are treated as going straight on
pub const STRAIGHT_LIMIT: f64 = 20.0;

/// Turns sharper than this many degrees either way are treated as U-turns
pub const U_TURN_LIMIT: f64 = 150.0;

const RIGHT_BASE: f64 = 20.0;
const LEFT_BASE: f64 = 160.0;
const U_TURN_BASE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Straight,
    Right,
    Left,
    UTurn,
}

/// Classify a signed turn angle in degrees, as produced by
/// [`turn_angle`]. Positive angles turn right.
pub fn classify_turn(angle: f64) -> TurnKind {
    let magnitude = angle.abs();
    if magnitude > U_TURN_LIMIT {
        TurnKind::UTurn
    } else if magnitude <= STRAIGHT_LIMIT {
        TurnKind::Straight
    } else if angle > 0.0 {
        TurnKind::Right
    } else {
        TurnKind::Left
    }
}

/// Score the turn from a street travelled at the incoming bearing onto one
/// leaving at the outgoing bearing. Lower is better.
pub fn turn_score(incoming: f64, outgoing: f64, penalties: &TurnPenalties) -> f64 {
    let angle = turn_angle(incoming, outgoing);
    let magnitude = angle.abs();
    match classify_turn(angle) {
        TurnKind::UTurn => {
            U_TURN_BASE + (magnitude - U_TURN_LIMIT) + penalties.u_turn
        }
        TurnKind::Straight => magnitude + penalties.straight,
        TurnKind::Right => RIGHT_BASE + angle + penalties.right,
        TurnKind::Left => LEFT_BASE + magnitude + penalties.left,
    }
}
