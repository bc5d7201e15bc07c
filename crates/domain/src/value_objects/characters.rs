//! Character skins and the stubbed human identity.
//!
//! Authentication is out of scope; every human caller acts as the single
//! default identity.

/// Display name and identity token used for every human player.
pub const DEFAULT_NAME: &str = "Me";

/// Appended to the display name to describe a human-controlled player.
pub const HUMAN_DESCRIPTION_SUFFIX: &str = "is a human player";

/// Fixed creature count shown on the status dashboard.
pub const DISPLAYED_CREATURES: u32 = 5;

/// A character sprite a joining player can be assigned, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterSkin {
    pub name: &'static str,
}

pub static CHARACTER_SKINS: [CharacterSkin; 8] = [
    CharacterSkin { name: "f1" },
    CharacterSkin { name: "f2" },
    CharacterSkin { name: "f3" },
    CharacterSkin { name: "f4" },
    CharacterSkin { name: "f5" },
    CharacterSkin { name: "f6" },
    CharacterSkin { name: "f7" },
    CharacterSkin { name: "f8" },
];

impl CharacterSkin {
    /// Pick a skin by an externally drawn index. Out-of-range indexes wrap.
    pub fn pick(index: usize) -> &'static CharacterSkin {
        &CHARACTER_SKINS[index % CHARACTER_SKINS.len()]
    }
}
