use std::fmt;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Item categories, one per sheet of the physical game material.
///
/// Every category owns one deck inside a [`PbfEntity`]; draws are keyed by
/// this enum instead of one hand-written operation per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SheetName {
    /// Civilization sheets.
    Civs,
    /// Aircraft unit cards.
    Aircraft,
    /// Artillery unit cards.
    Artillery,
    /// City-state cards.
    Citystates,
    /// Level I culture event cards.
    CultureI,
    /// Level II culture event cards.
    CultureIi,
    /// Level III culture event cards.
    CultureIii,
    /// Great person cards.
    GreatPersons,
    /// Hut exploration tokens.
    Huts,
    /// Infantry unit cards.
    Infantry,
    /// Mounted unit cards.
    Mounted,
    /// Map tiles.
    Tiles,
    /// Village exploration tokens.
    Villages,
    /// Wonder cards.
    Wonders,
}

impl SheetName {
    /// All categories, in sheet order.
    pub const ALL: [SheetName; 14] = [
        SheetName::Civs,
        SheetName::Aircraft,
        SheetName::Artillery,
        SheetName::Citystates,
        SheetName::CultureI,
        SheetName::CultureIi,
        SheetName::CultureIii,
        SheetName::GreatPersons,
        SheetName::Huts,
        SheetName::Infantry,
        SheetName::Mounted,
        SheetName::Tiles,
        SheetName::Villages,
        SheetName::Wonders,
    ];

    /// Human readable singular label used when rendering log entries.
    pub fn label(self) -> &'static str {
        match self {
            SheetName::Civs => "Civilization",
            SheetName::Aircraft => "Aircraft",
            SheetName::Artillery => "Artillery",
            SheetName::Citystates => "City-state",
            SheetName::CultureI => "Culture I",
            SheetName::CultureIi => "Culture II",
            SheetName::CultureIii => "Culture III",
            SheetName::GreatPersons => "Great Person",
            SheetName::Huts => "Hut",
            SheetName::Infantry => "Infantry",
            SheetName::Mounted => "Mounted",
            SheetName::Tiles => "Tile",
            SheetName::Villages => "Village",
            SheetName::Wonders => "Wonder",
        }
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which edition of the board game a session is played with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// Base game.
    Base,
    /// Fame and Fortune expansion.
    FameAndFortune,
    /// Wisdom and Warfare expansion.
    WisdomAndWarfare,
    /// Dawn of Civilization edition.
    DawnOfCivilization,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameType::Base => "Base game",
            GameType::FameAndFortune => "Fame and Fortune",
            GameType::WisdomAndWarfare => "Wisdom and Warfare",
            GameType::DawnOfCivilization => "Dawn of Civilization",
        };
        f.write_str(label)
    }
}

/// One card, tile, or token held inside a deck.
///
/// The draw protocol treats items as opaque values; only the category tag
/// and the two reveal renderings matter to this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemEntity {
    /// Category this item belongs to.
    pub sheet: SheetName,
    /// Printed name identifying the item within its category.
    pub name: String,
    /// Optional flavour or rules text.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the item is still hidden from other players.
    #[serde(default = "default_hidden")]
    pub hidden: bool,
    /// Whether the item has been spent by its owner.
    #[serde(default)]
    pub used: bool,
}

fn default_hidden() -> bool {
    true
}

impl ItemEntity {
    /// New hidden, unused item of the given category.
    pub fn new(sheet: SheetName, name: impl Into<String>) -> Self {
        Self {
            sheet,
            name: name.into(),
            description: None,
            hidden: true,
            used: false,
        }
    }

    /// Redacted rendering safe to show every player: category only.
    pub fn reveal_public(&self) -> String {
        self.sheet.label().to_owned()
    }

    /// Full rendering naming the item; owner and admin only.
    pub fn reveal_all(&self) -> String {
        format!("{}: {}", self.sheet.label(), self.name)
    }
}

/// A play-by-forum game session: one deck per category plus the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PbfEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Display name of the session.
    pub name: String,
    /// Edition the session is played with.
    pub game_type: GameType,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Ids of the participating players.
    pub player_ids: Vec<Uuid>,
    /// Ordered decks keyed by category; front of the vector is drawn first.
    ///
    /// Deck order is fixed when the game is set up; draws never shuffle.
    pub decks: IndexMap<SheetName, Vec<ItemEntity>>,
}

impl PbfEntity {
    /// Current contents of one deck, front first. Missing decks read as empty.
    pub fn deck(&self, sheet: SheetName) -> &[ItemEntity] {
        self.decks.get(&sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove and return the front item of one deck.
    ///
    /// Returns `None` when the deck is empty or absent, leaving the game
    /// untouched.
    pub fn draw_from_deck(&mut self, sheet: SheetName) -> Option<ItemEntity> {
        let deck = self.decks.get_mut(&sheet)?;
        if deck.is_empty() {
            return None;
        }
        Some(deck.remove(0))
    }
}

/// Registered player. Read-mostly from this crate's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Primary key of the player.
    pub id: Uuid,
    /// Unique display name.
    pub username: String,
}

/// Persisted record of one item removed from a deck, attributed to a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawEntity {
    /// Store-assigned id, back-filled after the insert.
    pub id: Option<Uuid>,
    /// Game the item was drawn from.
    pub pbf_id: Uuid,
    /// Player who made the draw.
    pub player_id: Uuid,
    /// The item removed from the deck.
    pub item: ItemEntity,
    /// When the draw happened.
    pub created_at: SystemTime,
}

impl DrawEntity {
    /// New unsaved draw record for `item`, drawn now.
    pub fn new(pbf_id: Uuid, player_id: Uuid, item: ItemEntity) -> Self {
        Self {
            id: None,
            pbf_id,
            player_id,
            item,
            created_at: SystemTime::now(),
        }
    }
}

/// Audit entry of a draw visible to every player; the item stays redacted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicLogEntity {
    /// Store-assigned id, back-filled after the insert.
    pub id: Option<Uuid>,
    /// Game the logged draw belongs to.
    pub pbf_id: Uuid,
    /// Resolved username of the acting player.
    pub username: String,
    /// Snapshot of the draw being logged.
    pub draw: DrawEntity,
    /// Rendered log text, fixed at creation.
    pub message: String,
    /// When the entry was recorded.
    pub created_at: SystemTime,
}

impl PublicLogEntity {
    /// Build the redacted entry for a completed draw.
    pub fn for_draw(draw: &DrawEntity, username: String) -> Self {
        let message = format!("{username} drew {}", draw.item.reveal_public());
        Self {
            id: None,
            pbf_id: draw.pbf_id,
            username,
            draw: draw.clone(),
            message,
            created_at: SystemTime::now(),
        }
    }
}

/// Audit entry of a draw naming the item; owner and admin only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivateLogEntity {
    /// Store-assigned id, back-filled after the insert.
    pub id: Option<Uuid>,
    /// Game the logged draw belongs to.
    pub pbf_id: Uuid,
    /// Resolved username of the acting player.
    pub username: String,
    /// Snapshot of the draw being logged.
    pub draw: DrawEntity,
    /// Rendered log text, fixed at creation.
    pub message: String,
    /// Whether the item identity has been disclosed to the other players.
    /// Flipped by the reveal action in the outer layer, never here.
    pub reveal: bool,
    /// When the entry was recorded.
    pub created_at: SystemTime,
}

impl PrivateLogEntity {
    /// Build the revealed entry for a completed draw. Starts unrevealed.
    pub fn for_draw(draw: &DrawEntity, username: String) -> Self {
        let message = format!("{username} drew {}", draw.item.reveal_all());
        Self {
            id: None,
            pbf_id: draw.pbf_id,
            username,
            draw: draw.clone(),
            message,
            reveal: false,
            created_at: SystemTime::now(),
        }
    }
}
