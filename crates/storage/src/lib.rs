//! MongoDB-backed implementation of the domain's read-only store trait.
//!
//! Every operation opens its own client, performs the read, and shuts the
//! client down again: the dashboard serves one operator, so scoped
//! acquisition beats holding a pool open between page loads. Every driver
//! error is flattened into `DependencyError::Unreachable` so a store outage
//! degrades the affected section instead of crashing the process.

mod documents;

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client, Database,
};
use tracing::warn;

use leadboard_domain::model::{
    CollectionStats, DashboardStore, DependencyError, EmailReport, LeadSummary, ProbeResult,
    COLLECTION_EMAILS, COLLECTION_LEADS, TRACKED_COLLECTIONS,
};

use documents::{email_summary, lead_summary};

/// How long the driver may spend looking for a reachable server before the
/// probe reports the store as unreachable.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Holds only the resolved connection string; connections are scoped to each
/// call.
#[derive(Debug, Clone)]
pub struct MongoStore {
    uri: String,
}

impl MongoStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    async fn open(&self) -> ProbeResult<Client> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(DependencyError::unreachable)?;
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }
        Client::with_options(options).map_err(DependencyError::unreachable)
    }

    fn default_database(client: &Client) -> ProbeResult<Database> {
        client.default_database().ok_or_else(|| {
            DependencyError::Unreachable(
                "connection string does not name a default database".to_string(),
            )
        })
    }

    /// Runs `op` against a freshly opened client and shuts the client down
    /// afterwards regardless of the outcome.
    async fn with_client<T, F, Fut>(&self, op: F) -> ProbeResult<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: std::future::Future<Output = (Client, ProbeResult<T>)>,
    {
        let client = self.open().await?;
        let (client, result) = op(client).await;
        client.shutdown().await;
        if let Err(err) = &result {
            warn!(error = %err, "document store operation failed");
        }
        result
    }
}

#[async_trait]
impl DashboardStore for MongoStore {
    async fn list_collections(&self) -> ProbeResult<Vec<String>> {
        self.with_client(|client| async {
            let result = async {
                let db = Self::default_database(&client)?;
                db.list_collection_names(None)
                    .await
                    .map_err(DependencyError::unreachable)
            }
            .await;
            (client, result)
        })
        .await
    }

    async fn collection_stats(&self) -> ProbeResult<CollectionStats> {
        self.with_client(|client| async {
            let result = async {
                let db = Self::default_database(&client)?;
                let names = db
                    .list_collection_names(None)
                    .await
                    .map_err(DependencyError::unreachable)?;

                let mut stats = CollectionStats::default();
                for name in names {
                    if !TRACKED_COLLECTIONS.contains(&name.as_str()) {
                        continue;
                    }
                    let count = db
                        .collection::<Document>(&name)
                        .count_documents(doc! {}, None)
                        .await
                        .map_err(DependencyError::unreachable)?;
                    stats.insert(name, count);
                }
                Ok(stats)
            }
            .await;
            (client, result)
        })
        .await
    }

    async fn recent_leads(&self, limit: i64) -> ProbeResult<Vec<LeadSummary>> {
        self.with_client(|client| async {
            let result = async {
                let db = Self::default_database(&client)?;
                let options = FindOptions::builder()
                    .sort(doc! { "_id": -1 })
                    .limit(limit)
                    .build();
                let docs: Vec<Document> = db
                    .collection::<Document>(COLLECTION_LEADS)
                    .find(doc! {}, options)
                    .await
                    .map_err(DependencyError::unreachable)?
                    .try_collect()
                    .await
                    .map_err(DependencyError::unreachable)?;
                Ok(docs.iter().map(lead_summary).collect())
            }
            .await;
            (client, result)
        })
        .await
    }

    async fn email_report(&self, recent_limit: i64) -> ProbeResult<EmailReport> {
        self.with_client(|client| async {
            let result = async {
                let db = Self::default_database(&client)?;
                let emails = db.collection::<Document>(COLLECTION_EMAILS);

                let total = emails
                    .count_documents(doc! {}, None)
                    .await
                    .map_err(DependencyError::unreachable)?;
                let sent = emails
                    .count_documents(doc! { "status": "sent" }, None)
                    .await
                    .map_err(DependencyError::unreachable)?;
                let failed = emails
                    .count_documents(doc! { "status": "failed" }, None)
                    .await
                    .map_err(DependencyError::unreachable)?;

                let options = FindOptions::builder()
                    .sort(doc! { "_id": -1 })
                    .limit(recent_limit)
                    .build();
                let docs: Vec<Document> = emails
                    .find(doc! {}, options)
                    .await
                    .map_err(DependencyError::unreachable)?
                    .try_collect()
                    .await
                    .map_err(DependencyError::unreachable)?;

                Ok(EmailReport {
                    total,
                    sent,
                    failed,
                    recent: docs.iter().map(email_summary).collect(),
                })
            }
            .await;
            (client, result)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A URI the driver rejects at parse time, so these tests never touch the
    // network.
    const MALFORMED_URI: &str = "not-a-mongodb-uri";

    #[tokio::test]
    async fn malformed_uri_surfaces_as_unreachable_not_panic() {
        let store = MongoStore::new(MALFORMED_URI);
        let err = store.collection_stats().await.unwrap_err();
        assert!(matches!(err, DependencyError::Unreachable(_)));
    }

    #[tokio::test]
    async fn every_operation_is_guarded() {
        let store = MongoStore::new(MALFORMED_URI);
        assert!(store.list_collections().await.is_err());
        assert!(store.recent_leads(10).await.is_err());
        assert!(store.email_report(5).await.is_err());
    }

    #[tokio::test]
    async fn uri_without_default_database_is_reported() {
        // Parses fine but names no database; the failure must be descriptive,
        // not a driver panic.
        let store = MongoStore::new("mongodb://127.0.0.1:27017");
        let err = store.list_collections().await.unwrap_err();
        let DependencyError::Unreachable(message) = err;
        assert!(message.contains("default database"));
    }
}
