use futures::future::BoxFuture;
use mongodb::{Collection, Database, bson::doc, options::IndexOptions};
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoDrawDocument, MongoPbfDocument, MongoPlayerDocument, MongoPrivateLogDocument,
        MongoPublicLogDocument, doc_id,
    },
};
use crate::dao::{
    document_store::DocumentStore,
    models::{DrawEntity, PbfEntity, PlayerEntity, PrivateLogEntity, PublicLogEntity},
    storage::StorageResult,
};

const PBF_COLLECTION_NAME: &str = "pbfs";
const DRAW_COLLECTION_NAME: &str = "draws";
const PLAYER_COLLECTION_NAME: &str = "players";
const PUBLIC_LOG_COLLECTION_NAME: &str = "public_logs";
const PRIVATE_LOG_COLLECTION_NAME: &str = "private_logs";

/// MongoDB-backed [`DocumentStore`].
#[derive(Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let store = Self { database };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Usernames must stay unique across players; draws are queried per game.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let players = self
            .database
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME);
        let username_index = mongodb::IndexModel::builder()
            .keys(doc! {"username": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_username_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        players
            .create_index(username_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "username",
                source,
            })?;

        let draws = self
            .database
            .collection::<MongoDrawDocument>(DRAW_COLLECTION_NAME);
        let draw_index = mongodb::IndexModel::builder()
            .keys(doc! {"pbf_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("draw_pbf_idx".to_owned()))
                    .build(),
            )
            .build();

        draws
            .create_index(draw_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: DRAW_COLLECTION_NAME,
                index: "pbf_id",
                source,
            })?;

        Ok(())
    }

    fn pbf_collection(&self) -> Collection<MongoPbfDocument> {
        self.database.collection(PBF_COLLECTION_NAME)
    }

    fn draw_collection(&self) -> Collection<MongoDrawDocument> {
        self.database.collection(DRAW_COLLECTION_NAME)
    }

    fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database.collection(PLAYER_COLLECTION_NAME)
    }

    fn public_log_collection(&self) -> Collection<MongoPublicLogDocument> {
        self.database.collection(PUBLIC_LOG_COLLECTION_NAME)
    }

    fn private_log_collection(&self) -> Collection<MongoPrivateLogDocument> {
        self.database.collection(PRIVATE_LOG_COLLECTION_NAME)
    }

    async fn find_pbf(&self, id: Uuid) -> MongoResult<Option<PbfEntity>> {
        let document = self
            .pbf_collection()
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadPbf { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn save_pbf(&self, pbf: PbfEntity) -> MongoResult<()> {
        let id = pbf.id;
        let document: MongoPbfDocument = pbf.into();
        self.pbf_collection()
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SavePbf { id, source })?;

        Ok(())
    }

    async fn insert_draw(&self, draw: DrawEntity) -> MongoResult<Uuid> {
        let pbf_id = draw.pbf_id;
        let document = MongoDrawDocument::new(Uuid::new_v4(), draw);
        let id = document.id;
        self.draw_collection()
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertDraw { pbf_id, source })?;

        Ok(id)
    }

    async fn delete_draw(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .draw_collection()
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDraw { id, source })?;

        Ok(result.deleted_count > 0)
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .player_collection()
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn insert_public_log(&self, entry: PublicLogEntity) -> MongoResult<Uuid> {
        let document = MongoPublicLogDocument::new(Uuid::new_v4(), entry);
        let id = document.id;
        self.public_log_collection()
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertLog {
                collection: PUBLIC_LOG_COLLECTION_NAME,
                source,
            })?;

        Ok(id)
    }

    async fn delete_public_log(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .public_log_collection()
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteLog {
                id,
                collection: PUBLIC_LOG_COLLECTION_NAME,
                source,
            })?;

        Ok(result.deleted_count > 0)
    }

    async fn insert_private_log(&self, entry: PrivateLogEntity) -> MongoResult<Uuid> {
        let document = MongoPrivateLogDocument::new(Uuid::new_v4(), entry);
        let id = document.id;
        self.private_log_collection()
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertLog {
                collection: PRIVATE_LOG_COLLECTION_NAME,
                source,
            })?;

        Ok(id)
    }
}

impl DocumentStore for MongoDocumentStore {
    fn find_pbf(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PbfEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_pbf(id).await.map_err(Into::into) })
    }

    fn save_pbf(&self, pbf: PbfEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_pbf(pbf).await.map_err(Into::into) })
    }

    fn insert_draw(&self, draw: DrawEntity) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move { store.insert_draw(draw).await.map_err(Into::into) })
    }

    fn delete_draw(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_draw(id).await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn insert_public_log(
        &self,
        entry: PublicLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move { store.insert_public_log(entry).await.map_err(Into::into) })
    }

    fn insert_private_log(
        &self,
        entry: PrivateLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move { store.insert_private_log(entry).await.map_err(Into::into) })
    }

    fn delete_public_log(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_public_log(id).await.map_err(Into::into) })
    }
}
