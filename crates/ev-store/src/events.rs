//! Event repository.
//!
//! Create, look up, and list rows of the `events` table created by
//! `0001_create_events.sql`.

use crate::connection::StoreDb;
use crate::error::{StoreError, StoreResult};
use ev_core::{Event, EventCreate, ExternalId, ExternalIdGenerator, UuidV4Generator};
use tokio_util::sync::CancellationToken;

const SELECT_EVENT_COLUMNS: &str = "SELECT id, uuid, title, description FROM events";

/// Event operations over an open [`StoreDb`].
pub struct EventStore<'db> {
    db: &'db StoreDb,
    generator: Box<dyn ExternalIdGenerator>,
}

impl<'db> EventStore<'db> {
    /// Create a store that assigns random UUIDs as external ids.
    pub fn new(db: &'db StoreDb) -> Self {
        Self {
            db,
            generator: Box::new(UuidV4Generator),
        }
    }

    /// Replace the external id generator (e.g. with a deterministic stub).
    pub fn with_generator(mut self, generator: impl ExternalIdGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Insert a new event and return it with its store-assigned id.
    pub fn create(&self, cancel: &CancellationToken, data: &EventCreate) -> StoreResult<Event> {
        let raw = self.generator.generate();
        let external_id =
            ExternalId::try_new(raw.clone()).ok_or(StoreError::InvalidExternalId(raw))?;

        let event = self.db.transaction(cancel, |tx| {
            let id: i64 = tx
                .query_row(
                    "INSERT INTO events (uuid, title, description) VALUES (?, ?, ?) RETURNING id",
                    duckdb::params![external_id.as_str(), data.title, data.description],
                    |row| row.get(0),
                )
                .map_err(|e| StoreError::Query(format!("insert event: {e}")))?;

            Ok(Event {
                id,
                external_id: external_id.clone(),
                title: data.title.clone(),
                description: data.description.clone(),
            })
        })?;

        log::debug!("Created event {} ({})", event.id, event.external_id);
        Ok(event)
    }

    /// Look up a single event by its external id.
    pub fn find_by_external_id(
        &self,
        cancel: &CancellationToken,
        external_id: &str,
    ) -> StoreResult<Event> {
        let conn = self.db.checked_conn(cancel)?;
        let result = conn.query_row(
            &format!("{SELECT_EVENT_COLUMNS} WHERE uuid = ?"),
            duckdb::params![external_id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(event),
            Err(duckdb::Error::QueryReturnedNoRows) => Err(StoreError::NotFound {
                external_id: external_id.to_string(),
            }),
            Err(e) => Err(StoreError::Query(format!("find event: {e}"))),
        }
    }

    /// Return every event in storage order.
    ///
    /// No ordering is applied; callers that need one must sort.
    pub fn list_all(&self, cancel: &CancellationToken) -> StoreResult<Vec<Event>> {
        let conn = self.db.checked_conn(cancel)?;
        let mut stmt = conn
            .prepare(SELECT_EVENT_COLUMNS)
            .map_err(|e| StoreError::Query(format!("prepare list events: {e}")))?;

        let events = stmt
            .query_map([], map_event_row)
            .map_err(|e| StoreError::Query(format!("list events: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query(format!("collect events: {e}")))?;
        Ok(events)
    }
}

/// Map an `id, uuid, title, description` row.
fn map_event_row(row: &duckdb::Row<'_>) -> duckdb::Result<Event> {
    let uuid: String = row.get(1)?;
    let external_id = ExternalId::try_new(uuid).ok_or_else(|| {
        duckdb::Error::FromSqlConversionFailure(1, duckdb::types::Type::Text, "empty uuid".into())
    })?;

    Ok(Event {
        id: row.get(0)?,
        external_id,
        title: row.get(2)?,
        description: row.get(3)?,
    })
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
