use crate::errors::StoreError;
use crate::models::Entry;
use crate::storage::EntryStore;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// Owns the ordered entry collection and rewrites the store after every mutation.
pub struct Tracker {
    store: EntryStore,
    entries: Vec<Entry>,
}

impl Tracker {
    pub async fn open(store: EntryStore) -> Self {
        let entries = store.load().await;
        Self { store, entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.date == date)
    }

    pub fn today_entry(&self) -> Option<&Entry> {
        self.entry_for(today())
    }

    /// The newest `count` entries in stored order.
    pub fn recent(&self, count: usize) -> &[Entry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub async fn upsert_today(&mut self, goal: u32, achieved: u32) -> Result<Entry, StoreError> {
        self.upsert(today(), goal, achieved).await
    }

    /// Updates the entry for `date` in place, or prepends a new one.
    pub async fn upsert(
        &mut self,
        date: NaiveDate,
        goal: u32,
        achieved: u32,
    ) -> Result<Entry, StoreError> {
        let entry = match self.entries.iter_mut().find(|entry| entry.date == date) {
            Some(existing) => {
                existing.goal = goal;
                existing.achieved = achieved;
                info!(%date, goal, achieved, "updated entry");
                existing.clone()
            }
            None => {
                let created = Entry::new(date, goal, achieved);
                info!(%date, goal, achieved, id = %created.id, "created entry");
                self.entries.insert(0, created.clone());
                created
            }
        };

        self.persist().await?;
        Ok(entry)
    }

    /// Replaces the entry with the same id. Returns whether one matched.
    pub async fn update(&mut self, entry: Entry) -> Result<bool, StoreError> {
        let matched = match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => {
                info!(id = %entry.id, date = %entry.date, "replaced entry");
                *existing = entry;
                true
            }
            None => {
                debug!(id = %entry.id, "update for unknown entry ignored");
                false
            }
        };

        self.persist().await?;
        Ok(matched)
    }

    /// Removes the entry with `id`. Returns whether one matched.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            info!(id, "deleted entry");
        } else {
            debug!(id, "delete for unknown entry ignored");
        }

        self.persist().await?;
        Ok(removed)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        self.store.save(&self.entries).await
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use chrono::Duration;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    async fn tracker() -> (Tracker, EntryStore) {
        let store = EntryStore::new(Arc::new(MemorySlot::default()));
        (Tracker::open(store.clone()).await, store)
    }

    #[tokio::test]
    async fn distinct_dates_each_add_one_entry() {
        let (mut tracker, _) = tracker().await;
        for n in 0..20 {
            let len = tracker.entries().len();
            tracker.upsert(day(n), 5000 + n as u32, 100 * n as u32).await.unwrap();
            assert_eq!(tracker.entries().len(), len + 1);
        }

        let dates: HashSet<_> = tracker.entries().iter().map(|entry| entry.date).collect();
        assert_eq!(dates.len(), 20);
    }

    #[tokio::test]
    async fn new_entries_are_prepended() {
        let (mut tracker, _) = tracker().await;
        tracker.upsert(day(0), 100, 1).await.unwrap();
        tracker.upsert(day(1), 100, 2).await.unwrap();

        assert_eq!(tracker.entries()[0].date, day(1));
        assert_eq!(tracker.recent(1)[0].date, day(1));
        assert_eq!(tracker.recent(5).len(), 2);
    }

    #[tokio::test]
    async fn same_date_upsert_keeps_id_and_takes_latest_values() {
        let (mut tracker, _) = tracker().await;
        let first = tracker.upsert(day(0), 10000, 2000).await.unwrap();
        tracker.upsert(day(1), 10000, 2000).await.unwrap();
        let second = tracker.upsert(day(0), 8000, 9000).await.unwrap();

        assert_eq!(tracker.entries().len(), 2);
        assert_eq!(second.id, first.id);
        let stored = tracker.entry_for(day(0)).unwrap();
        assert_eq!((stored.goal, stored.achieved), (8000, 9000));
        assert_eq!(stored.id, first.id);
        // Updated in place, not moved to the front.
        assert_eq!(tracker.entries()[1].id, first.id);
    }

    #[tokio::test]
    async fn update_replaces_matching_entry_verbatim() {
        let (mut tracker, _) = tracker().await;
        let entry = tracker.upsert(day(0), 10000, 2000).await.unwrap();
        let replacement = Entry {
            date: day(3),
            goal: 1,
            achieved: 0,
            ..entry
        };

        assert!(tracker.update(replacement.clone()).await.unwrap());
        assert_eq!(tracker.entries(), &[replacement]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_noop() {
        let (mut tracker, _) = tracker().await;
        tracker.upsert(day(0), 10000, 2000).await.unwrap();
        let before = tracker.entries().to_vec();

        let stranger = Entry::new(day(0), 1, 1);
        assert!(!tracker.update(stranger).await.unwrap());
        assert_eq!(tracker.entries(), before.as_slice());
    }

    #[tokio::test]
    async fn delete_removes_matching_entry() {
        let (mut tracker, store) = tracker().await;
        let keep = tracker.upsert(day(0), 10000, 2000).await.unwrap();
        let gone = tracker.upsert(day(1), 10000, 3000).await.unwrap();

        assert!(tracker.delete(&gone.id).await.unwrap());
        assert_eq!(tracker.entries(), &[keep.clone()]);
        assert_eq!(store.load().await, vec![keep]);
    }

    #[tokio::test]
    async fn deleting_unknown_id_leaves_collection_unchanged() {
        let (mut tracker, store) = tracker().await;
        tracker.upsert(day(0), 10000, 2000).await.unwrap();
        tracker.upsert(day(1), 10000, 3000).await.unwrap();
        let before = tracker.entries().to_vec();

        assert!(!tracker.delete("no-such-id").await.unwrap());
        assert_eq!(tracker.entries(), before.as_slice());
        assert_eq!(store.load().await, before);
    }

    #[tokio::test]
    async fn every_mutation_is_persisted() {
        let (mut tracker, store) = tracker().await;
        let entry = tracker.upsert(day(0), 10000, 2000).await.unwrap();
        assert_eq!(store.load().await, tracker.entries());

        tracker
            .update(Entry { achieved: 7000, ..entry.clone() })
            .await
            .unwrap();
        assert_eq!(store.load().await[0].achieved, 7000);

        tracker.delete(&entry.id).await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn reopening_restores_collection() {
        let (mut tracker, store) = tracker().await;
        tracker.upsert(day(0), 10000, 2000).await.unwrap();
        tracker.upsert(day(1), 9000, 3000).await.unwrap();

        let reopened = Tracker::open(store).await;
        assert_eq!(reopened.entries(), tracker.entries());
    }

    #[tokio::test]
    async fn upsert_today_uses_local_date() {
        let (mut tracker, _) = tracker().await;
        let entry = tracker.upsert_today(10000, 500).await.unwrap();
        assert_eq!(entry.date, today());
        assert_eq!(tracker.today_entry(), Some(&entry));
    }
}
