//! Value objects - immutable values without identity

pub mod ambient;
mod characters;
mod tile;

pub use ambient::AmbientSignal;
pub use characters::{
    CharacterSkin, CHARACTER_SKINS, DEFAULT_NAME, DISPLAYED_CREATURES, HUMAN_DESCRIPTION_SUFFIX,
};
pub use tile::TilePoint;
