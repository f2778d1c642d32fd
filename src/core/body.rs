// Skeleton attachment points and facing directions of the paper-doll

use glam::Vec2;
use std::fmt;
use std::str::FromStr;

/// Canonical body parts making up the paper-doll.
///
/// Names must match the base layer names of the rig exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    Head,
    Chest,
    LArm,
    RArm,
    BackArm,
    FrontArm,
    LLeg,
    RLeg,
    BackLeg,
    FrontLeg,
    LLegBack,
    RLegBack,
}

impl BodyPart {
    /// All parts in canonical order
    pub const ALL: [BodyPart; 12] = [
        BodyPart::Head,
        BodyPart::Chest,
        BodyPart::LArm,
        BodyPart::RArm,
        BodyPart::BackArm,
        BodyPart::FrontArm,
        BodyPart::LLeg,
        BodyPart::RLeg,
        BodyPart::BackLeg,
        BodyPart::FrontLeg,
        BodyPart::LLegBack,
        BodyPart::RLegBack,
    ];

    /// Layer identifier used by rigs and animation events
    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Head => "Head",
            BodyPart::Chest => "Chest",
            BodyPart::LArm => "L_Arm",
            BodyPart::RArm => "R_Arm",
            BodyPart::BackArm => "Back_Arm",
            BodyPart::FrontArm => "Front_Arm",
            BodyPart::LLeg => "L_Leg",
            BodyPart::RLeg => "R_Leg",
            BodyPart::BackLeg => "Back_Leg",
            BodyPart::FrontLeg => "Front_Leg",
            BodyPart::LLegBack => "L_Leg_Back",
            BodyPart::RLegBack => "R_Leg_Back",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a layer name does not match any body part
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown body part: {0}")]
pub struct UnknownBodyPart(pub String);

impl FromStr for BodyPart {
    type Err = UnknownBodyPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|part| part.name() == s)
            .ok_or_else(|| UnknownBodyPart(s.to_string()))
    }
}

/// Facing directions; each maps to one authored pose of the rig.
///
/// There is no separate left/right art: facing left is the Side pose mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Direction {
    #[default]
    Down,
    Side,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Down, Direction::Side, Direction::Up];

    /// Dense index, usable for per-direction arrays
    pub fn index(&self) -> usize {
        match self {
            Direction::Down => 0,
            Direction::Side => 1,
            Direction::Up => 2,
        }
    }

    /// Name of the root container holding this direction's base layers
    pub fn root_name(&self) -> &'static str {
        match self {
            Direction::Down => "Base_Down_Fixed",
            Direction::Side => "Base_Side_Fixed",
            Direction::Up => "Base_Up_Fixed",
        }
    }

    /// Pick a facing from a movement vector.
    ///
    /// Returns the direction and whether the Side pose should be mirrored.
    /// Horizontal movement wins ties. A zero vector yields `None`.
    pub fn from_vector(v: Vec2) -> Option<(Direction, bool)> {
        if v == Vec2::ZERO {
            return None;
        }

        if v.x.abs() >= v.y.abs() {
            Some((Direction::Side, v.x < 0.0))
        } else if v.y > 0.0 {
            Some((Direction::Up, false))
        } else {
            Some((Direction::Down, false))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Down => "Down",
            Direction::Side => "Side",
            Direction::Up => "Up",
        };
        f.write_str(name)
    }
}
