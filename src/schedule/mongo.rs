//! MongoDB-backed schedule store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::StoreError;

use super::store::ScheduleStore;
use super::types::{DeleteResult, InsertResult, Schedule, ScheduleFields, ScheduleId, UpdateResult};

/// Schedule document as stored in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default, deserialize_with = "lenient_text")]
    title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    day: String,
    #[serde(default, deserialize_with = "lenient_text")]
    date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    time: String,
    #[serde(default)]
    completed: bool,
}

/// Read a text field that older writers may have stored as a number,
/// boolean or other BSON value.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Bson::deserialize(deserializer)? {
        Bson::String(s) => s,
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(f) => f.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null | Bson::Undefined => String::new(),
        other => other.into_relaxed_extjson().to_string(),
    })
}

impl From<ScheduleDocument> for Schedule {
    fn from(document: ScheduleDocument) -> Self {
        Schedule {
            id: document.id.into(),
            title: document.title,
            day: document.day,
            date: document.date,
            time: document.time,
            completed: document.completed,
        }
    }
}

/// Schedule store over a MongoDB collection.
///
/// Holds one driver `Client`, which pools connections internally and is
/// shared by every request.
#[derive(Debug, Clone)]
pub struct MongoScheduleStore {
    client: Client,
    collection: Collection<ScheduleDocument>,
}

impl MongoScheduleStore {
    /// Build a client for the configured deployment.
    ///
    /// Fails only when the connection string cannot be parsed; the server is
    /// not contacted until the first operation (see [`ScheduleStore::ping`]).
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        info!(
            database = %config.mongodb_database,
            collection = %config.mongodb_collection,
            "MongoDB client created"
        );

        Ok(Self::from_client(
            client,
            &config.mongodb_database,
            &config.mongodb_collection,
        ))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { client, collection }
    }

    fn by_id(id: &ScheduleId) -> Document {
        doc! { "_id": id.object_id() }
    }
}

#[async_trait]
impl ScheduleStore for MongoScheduleStore {
    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        debug!("MongoDB ping ok");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Schedule>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<ScheduleDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Schedule::from).collect())
    }

    #[instrument(skip(self, fields))]
    async fn insert_one(&self, fields: ScheduleFields) -> Result<InsertResult, StoreError> {
        let document = doc! {
            "title": fields.title,
            "day": fields.day,
            "date": fields.date,
            "time": fields.time,
            "completed": false,
        };
        let result = self
            .collection
            .clone_with_type::<Document>()
            .insert_one(document)
            .await?;
        let oid = result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?;
        Ok(InsertResult {
            acknowledged: true,
            inserted_id: oid.into(),
        })
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update_one(
        &self,
        id: &ScheduleId,
        fields: ScheduleFields,
    ) -> Result<UpdateResult, StoreError> {
        let update = doc! {
            "$set": {
                "title": fields.title,
                "day": fields.day,
                "date": fields.date,
                "time": fields.time,
            }
        };
        let result = self.collection.update_one(Self::by_id(id), update).await?;
        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_completed(&self, id: &ScheduleId) -> Result<UpdateResult, StoreError> {
        let update = doc! { "$set": { "completed": true } };
        let result = self.collection.update_one(Self::by_id(id), update).await?;
        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_one(&self, id: &ScheduleId) -> Result<DeleteResult, StoreError> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;
        Ok(DeleteResult {
            deleted_count: result.deleted_count,
        })
    }
}
