use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    DrawEntity, GameType, ItemEntity, PbfEntity, PlayerEntity, PrivateLogEntity, PublicLogEntity,
    SheetName,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPbfDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    game_type: GameType,
    created_at: DateTime,
    player_ids: Vec<Uuid>,
    decks: Vec<MongoDeckDocument>,
}

/// One category deck, stored as a tagged subdocument so deck order inside the
/// game document is explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDeckDocument {
    sheet: SheetName,
    items: Vec<ItemEntity>,
}

impl From<PbfEntity> for MongoPbfDocument {
    fn from(value: PbfEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            game_type: value.game_type,
            created_at: DateTime::from_system_time(value.created_at),
            player_ids: value.player_ids,
            decks: value
                .decks
                .into_iter()
                .map(|(sheet, items)| MongoDeckDocument { sheet, items })
                .collect(),
        }
    }
}

impl From<MongoPbfDocument> for PbfEntity {
    fn from(value: MongoPbfDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            game_type: value.game_type,
            created_at: value.created_at.to_system_time(),
            player_ids: value.player_ids,
            decks: value
                .decks
                .into_iter()
                .map(|deck| (deck.sheet, deck.items))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDrawDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pbf_id: Uuid,
    player_id: Uuid,
    item: ItemEntity,
    created_at: DateTime,
}

impl MongoDrawDocument {
    /// Shape an unsaved draw into a document under the given id.
    pub fn new(id: Uuid, draw: DrawEntity) -> Self {
        Self {
            id,
            pbf_id: draw.pbf_id,
            player_id: draw.player_id,
            item: draw.item,
            created_at: DateTime::from_system_time(draw.created_at),
        }
    }
}

impl From<MongoDrawDocument> for DrawEntity {
    fn from(value: MongoDrawDocument) -> Self {
        Self {
            id: Some(value.id),
            pbf_id: value.pbf_id,
            player_id: value.player_id,
            item: value.item,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// Draw snapshot embedded inside log documents; the id may still be unset
/// because logs are written before the draw id is back-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDrawSnapshot {
    id: Option<Uuid>,
    pbf_id: Uuid,
    player_id: Uuid,
    item: ItemEntity,
    created_at: DateTime,
}

impl From<DrawEntity> for MongoDrawSnapshot {
    fn from(value: DrawEntity) -> Self {
        Self {
            id: value.id,
            pbf_id: value.pbf_id,
            player_id: value.player_id,
            item: value.item,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoDrawSnapshot> for DrawEntity {
    fn from(value: MongoDrawSnapshot) -> Self {
        Self {
            id: value.id,
            pbf_id: value.pbf_id,
            player_id: value.player_id,
            item: value.item,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    username: String,
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            username: value.username,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPublicLogDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pbf_id: Uuid,
    username: String,
    draw: MongoDrawSnapshot,
    message: String,
    created_at: DateTime,
}

impl MongoPublicLogDocument {
    /// Shape an unsaved public log entry into a document under the given id.
    pub fn new(id: Uuid, entry: PublicLogEntity) -> Self {
        Self {
            id,
            pbf_id: entry.pbf_id,
            username: entry.username,
            draw: entry.draw.into(),
            message: entry.message,
            created_at: DateTime::from_system_time(entry.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPrivateLogDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pbf_id: Uuid,
    username: String,
    draw: MongoDrawSnapshot,
    message: String,
    reveal: bool,
    created_at: DateTime,
}

impl MongoPrivateLogDocument {
    /// Shape an unsaved private log entry into a document under the given id.
    pub fn new(id: Uuid, entry: PrivateLogEntity) -> Self {
        Self {
            id,
            pbf_id: entry.pbf_id,
            username: entry.username,
            draw: entry.draw.into(),
            message: entry.message,
            reveal: entry.reveal,
            created_at: DateTime::from_system_time(entry.created_at),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
