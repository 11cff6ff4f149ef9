//! Shared catalog model for Quest Chronicles content.

pub mod defs;
pub mod error;
pub mod parse;
pub mod validate;

pub use defs::*;
pub use error::{DataError, EffectError};
pub use parse::{build_item_catalog, build_quest_catalog, format_item, format_quest, parse_items, parse_quests};
pub use validate::{ValidationError, validate_catalog};
