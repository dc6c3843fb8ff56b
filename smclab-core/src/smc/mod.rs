//! Smart-money concept detectors.
//!
//! Every detector is a pure function of the candle series (or of the swing
//! points derived from it) and builds its own state per call.

pub mod buffer;
pub mod fvg;
pub mod liquidity;
pub mod order_block;
pub mod premium_discount;
pub mod structure;

pub use buffer::RecentBuffer;
pub use fvg::{detect_fair_value_gaps, FairValueGap, GapKind};
pub use liquidity::{detect_liquidity_zones, LiquidityZone, LiquidityZones};
pub use order_block::{detect_order_blocks, OrderBlock, OrderBlockKind};
pub use premium_discount::{
    premium_discount_zone, PremiumDiscountBias, PremiumDiscountZone, ZoneLevels,
};
pub use structure::{classify_structure, StructureLevels};
