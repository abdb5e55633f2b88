use serde::de::DeserializeOwned;

use crate::{
    database::{Collection, Store},
    error::AppError,
    models::{Pledge, Rsvp, Timestamped},
};

async fn find_documents<T>(
    store: &dyn Store,
    collection: Collection,
    slug: &str,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Timestamped,
{
    let mut records = store
        .find(collection, slug)
        .await?
        .iter()
        .map(|document| serde_json::from_str::<T>(document))
        .collect::<Result<Vec<T>, _>>()?;

    // stable, so equal timestamps keep the store's newest-first order
    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

    Ok(records)
}

/// All RSVPs for `slug`, newest first.
pub async fn list_rsvps(store: &dyn Store, slug: &str) -> Result<Vec<Rsvp>, AppError> {
    find_documents(store, Collection::Rsvps, slug).await
}

/// All pledges for `slug`, newest first.
pub async fn list_pledges(store: &dyn Store, slug: &str) -> Result<Vec<Pledge>, AppError> {
    find_documents(store, Collection::Pledges, slug).await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{database::MemoryStore, models::RsvpStatus};

    fn rsvp(id: &str, minutes: i64) -> Rsvp {
        let at = Utc.with_ymd_and_hms(2026, 4, 20, 14, 0, 0).unwrap() + Duration::minutes(minutes);

        Rsvp {
            id: id.to_string(),
            event_slug: "slug".to_string(),
            full_name: id.to_string(),
            status: RsvpStatus::Accept,
            guests: 1,
            phone: None,
            message: None,
            created_at: at,
            updated_at: at,
        }
    }

    async fn insert(store: &MemoryStore, rsvp: &Rsvp) {
        store
            .insert(Collection::Rsvps, "slug", serde_json::to_string(rsvp).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sorted_by_created_at() {
        let store = MemoryStore::new();

        // inserted out of timestamp order
        insert(&store, &rsvp("t2", 2)).await;
        insert(&store, &rsvp("t1", 1)).await;
        insert(&store, &rsvp("t3", 3)).await;

        let ids: Vec<String> = list_rsvps(&store, "slug")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = MemoryStore::new();

        insert(&store, &rsvp("first", 0)).await;
        insert(&store, &rsvp("second", 0)).await;

        let ids: Vec<String> = list_rsvps(&store, "slug")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Pledges, "slug", "not json".to_string())
            .await
            .unwrap();

        let result = list_pledges(&store, "slug").await;
        assert!(matches!(result, Err(AppError::Corrupt(_))));
    }
}
