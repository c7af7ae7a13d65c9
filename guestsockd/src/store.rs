//! Message store access.
//!
//! Thin wrapper over the MongoDB driver. The collection is append-only
//! from this process's point of view: the listener inserts one document
//! per qualifying submission and never reads anything back.
//!
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};

const DB_NAME: &str = "messages";
const COLLECTION_NAME: &str = "messages";

/// Handle on the persisted message collection
pub struct MessageStore {
    messages: Collection<Document>,
}

impl MessageStore {
    /// Connect to the store and verify it answers a ping.
    ///
    /// The listener refuses to start without a reachable store, so any
    /// failure here is returned to the caller as fatal.
    pub async fn connect(uri: &str) -> mongodb::error::Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .build(),
        );
        let client = Client::with_options(options)?;

        client.database("admin").run_command(doc! { "ping": 1 }).await?;
        println!("✅ Connected to the message store");

        Ok(Self {
            messages: client.database(DB_NAME).collection(COLLECTION_NAME),
        })
    }

    /// Append one record. The write blocks until acknowledged; the caller
    /// treats a failure as fatal.
    pub async fn insert(&self, record: Document) -> mongodb::error::Result<()> {
        self.messages.insert_one(record).await?;
        Ok(())
    }
}
