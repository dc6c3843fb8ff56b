//! Market structure from swing sequences.
//!
//! A swing high is a higher high when its price exceeds the immediately
//! preceding swing high; a swing low is a lower low when its price is below
//! the preceding swing low. The first swing of each kind has no predecessor
//! and is never classified.

use crate::indicators::{SwingPoint, Swings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureLevels {
    pub higher_highs: Vec<SwingPoint>,
    pub lower_lows: Vec<SwingPoint>,
    /// Reserved in the payload contract; the current rule set leaves it empty.
    pub internal_bos: Vec<SwingPoint>,
    /// Reserved in the payload contract; the current rule set leaves it empty.
    pub change_of_character: Vec<SwingPoint>,
}

pub fn classify_structure(swings: &Swings) -> StructureLevels {
    let higher_highs = swings
        .highs
        .windows(2)
        .filter(|pair| pair[1].price > pair[0].price)
        .map(|pair| pair[1].clone())
        .collect();

    let lower_lows = swings
        .lows
        .windows(2)
        .filter(|pair| pair[1].price < pair[0].price)
        .map(|pair| pair[1].clone())
        .collect();

    StructureLevels {
        higher_highs,
        lower_lows,
        internal_bos: Vec::new(),
        change_of_character: Vec::new(),
    }
}
