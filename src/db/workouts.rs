use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};

use super::WorkoutStore;
use crate::models::{NewWorkout, WorkoutRecord};

impl WorkoutStore {
    /// Every workout, newest first. The list screen has no paging, so this
    /// is the only read query the application needs.
    pub fn list_all(&self) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, activity, durationMinutes, category, partnerName
                 FROM workouts
                 ORDER BY id DESC",
            )
            .context("failed to prepare workouts query")?;

        let workouts = stmt
            .query_map([], map_workout)
            .context("failed to load workouts")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect workouts")?;

        Ok(workouts)
    }

    /// Insert a workout exactly as given and return it with its new id. The
    /// store does not validate anything; required-field checks belong to
    /// the form.
    pub fn insert(&self, workout: &NewWorkout) -> Result<WorkoutRecord> {
        self.conn
            .execute(
                "INSERT INTO workouts (activity, durationMinutes, category, partnerName)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    workout.activity,
                    workout.duration_minutes,
                    workout.category,
                    workout.partner_name
                ],
            )
            .context("failed to insert workout")?;

        let id = self.conn.last_insert_rowid();
        info!("inserted workout {id}");
        Ok(workout.clone().into_record(id))
    }

    /// Remove a workout by id. A missing row is not an error: the list may
    /// already be stale and deleting twice should be harmless.
    pub fn delete(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id])
            .context("failed to delete workout")?;

        if deleted == 0 {
            debug!("delete of workout {id} matched no rows");
        } else {
            info!("deleted workout {id}");
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .context("failed to count workouts")?;
        Ok(count.max(0) as usize)
    }
}

fn map_workout(row: &Row<'_>) -> rusqlite::Result<WorkoutRecord> {
    Ok(WorkoutRecord {
        id: row.get(0)?,
        activity: row.get(1)?,
        duration_minutes: column_text(row, 2)?,
        category: row.get(3)?,
        partner_name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// `durationMinutes` has INTEGER affinity, so SQLite turns numeric-looking
/// text into an integer while anything else stays text. Render whatever
/// storage class came back as a string.
fn column_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    let text = match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WorkoutStore {
        WorkoutStore::open_in_memory().expect("in-memory store")
    }

    #[test]
    fn empty_table_lists_nothing() {
        let store = store();
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn lists_newest_first_with_growing_ids() {
        let store = store();
        let mut ids = Vec::new();
        for minutes in ["10", "20", "30", "40"] {
            let record = store
                .insert(&NewWorkout::new("Running", minutes, "Cardio", ""))
                .unwrap();
            if let Some(last) = ids.last() {
                assert!(record.id > *last);
            }
            ids.push(record.id);
        }

        let listed: Vec<i64> = store.list_all().unwrap().iter().map(|w| w.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let first = store
            .insert(&NewWorkout::new("Yoga", "60", "Mobility", ""))
            .unwrap();
        store.delete(first.id).unwrap();
        let second = store
            .insert(&NewWorkout::new("Yoga", "60", "Mobility", ""))
            .unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn insert_then_delete_restores_previous_state() {
        let store = store();
        store
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", ""))
            .unwrap();
        let before = store.list_all().unwrap();

        let record = store
            .insert(&NewWorkout::new("Natação", "50", "Cardio", "Ana"))
            .unwrap();
        store.delete(record.id).unwrap();

        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn deleting_missing_id_is_a_no_op() {
        let store = store();
        store
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", ""))
            .unwrap();
        let before = store.list_all().unwrap();

        store.delete(9_999).unwrap();
        store.delete(-1).unwrap();

        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn duration_round_trips_as_text() {
        let store = store();
        store
            .insert(&NewWorkout::new("Walk", "45", "Cardio", ""))
            .unwrap();
        store
            .insert(&NewWorkout::new("Hike", "about an hour", "Outdoor", ""))
            .unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed[0].duration_minutes, "about an hour");
        assert_eq!(listed[1].duration_minutes, "45");
    }

    #[test]
    fn null_partner_reads_back_empty() {
        let store = store();
        store
            .conn
            .execute(
                "INSERT INTO workouts (activity, durationMinutes, category, partnerName)
                 VALUES ('Row', 20, 'Cardio', NULL)",
                [],
            )
            .unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed[0].partner_name, "");
        assert_eq!(listed[0].duration_minutes, "20");
    }

    #[test]
    fn schema_initialization_is_idempotent() {
        let store = store();
        store
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", ""))
            .unwrap();
        store.initialize_schema().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn example_scenario_orders_and_deletes() {
        let store = store();
        let corrida = store
            .insert(&NewWorkout::new("Corrida", "30", "Cardio", ""))
            .unwrap();
        store
            .insert(&NewWorkout::new("Musculação", "45", "Força", "Bruna"))
            .unwrap();

        let listed = store.list_all().unwrap();
        let fields: Vec<_> = listed
            .iter()
            .map(|w| {
                (
                    w.activity.as_str(),
                    w.duration_minutes.as_str(),
                    w.category.as_str(),
                    w.partner_name.as_str(),
                )
            })
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Musculação", "45", "Força", "Bruna"),
                ("Corrida", "30", "Cardio", ""),
            ]
        );

        store.delete(corrida.id).unwrap();
        let remaining = store.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].activity, "Musculação");
    }
}
