//! Structure-based generic residue numbers.
//!
//! A generic number such as `3x50` names a residue by helix and relative position so that
//! equivalent residues line up across receptors. A third position digit marks a helix bulge
//! inserted after the base position (`2x551` follows `2x55`). Labels accept either the `x`
//! separator used by the catalog or the `.` separator used in GPCRDB-indexed structure files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Typed generic number ordered by helix, position, then insertion digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericNumber {
    helix: u8,
    position: u8,
    insertion: Option<u8>,
}

impl GenericNumber {
    /// Creates a two-digit generic number; `position` must be below 100.
    pub fn new(helix: u8, position: u8) -> Option<Self> {
        (position < 100).then_some(Self {
            helix,
            position,
            insertion: None,
        })
    }

    /// Creates a three-digit (bulge) generic number following `position`.
    pub fn with_insertion(helix: u8, position: u8, insertion: u8) -> Option<Self> {
        (position < 100 && insertion < 10).then_some(Self {
            helix,
            position,
            insertion: Some(insertion),
        })
    }

    pub fn helix(&self) -> u8 {
        self.helix
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn insertion(&self) -> Option<u8> {
        self.insertion
    }

    /// Returns `true` for three-digit labels.
    pub fn has_insertion(&self) -> bool {
        self.insertion.is_some()
    }

    /// Returns `true` for the seven transmembrane helices.
    pub fn is_transmembrane(&self) -> bool {
        (1..=7).contains(&self.helix)
    }

    /// Drops the insertion digit, yielding the two-digit label the bulge follows.
    pub fn base(&self) -> Self {
        Self {
            insertion: None,
            ..*self
        }
    }

    /// Steps `offset` positions along the helix.
    ///
    /// Two-digit labels move by exactly `offset`. A three-digit label sits between its base
    /// position and the next one, so forward steps count from the base while backward steps
    /// count the base itself as the first neighbour. For `2x411`, offsets `-2, -1, 1, 2`
    /// yield `2x40, 2x41, 2x42, 2x43`. Results never carry an insertion digit.
    ///
    /// # Returns
    ///
    /// `None` when the step leaves the two-digit position range.
    pub fn offset(&self, offset: i32) -> Option<Self> {
        let step = if self.insertion.is_some() && offset < 0 {
            offset + 1
        } else {
            offset
        };
        let target = i32::from(self.position) + step;
        if !(0..100).contains(&target) {
            return None;
        }
        Some(Self {
            helix: self.helix,
            position: target as u8,
            insertion: None,
        })
    }

    /// Label using the `.` separator, as keyed inside GPCRDB atom tables.
    pub fn dotted(&self) -> String {
        self.render('.')
    }

    fn render(&self, separator: char) -> String {
        match self.insertion {
            Some(digit) => format!("{}{}{:02}{}", self.helix, separator, self.position, digit),
            None => format!("{}{}{:02}", self.helix, separator, self.position),
        }
    }
}

impl fmt::Display for GenericNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render('x'))
    }
}

impl FromStr for GenericNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (helix, position) = trimmed
            .split_once(['x', '.'])
            .ok_or_else(|| format!("Invalid generic number '{}': missing separator", s))?;

        let helix: u8 = helix
            .parse()
            .map_err(|_| format!("Invalid generic number '{}': bad helix", s))?;

        if !position.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid generic number '{}': bad position", s));
        }

        let digit = |range: std::ops::Range<usize>| -> Result<u8, String> {
            position[range]
                .parse()
                .map_err(|_| format!("Invalid generic number '{}': bad position", s))
        };

        match position.len() {
            2 => Ok(Self {
                helix,
                position: digit(0..2)?,
                insertion: None,
            }),
            3 => Ok(Self {
                helix,
                position: digit(0..2)?,
                insertion: Some(digit(2..3)?),
            }),
            _ => Err(format!(
                "Invalid generic number '{}': position must have 2 or 3 digits",
                s
            )),
        }
    }
}

impl Serialize for GenericNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenericNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
