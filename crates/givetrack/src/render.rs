//! Rebuilding a tracker's table and total from the store.
//!
//! Each call reads the collection fresh; the rendered rows are a full
//! rebuild, never a diff.

use tracing::trace;

use crate::collection::{Collection, Record};
use crate::error::Result;
use crate::store::KeyValueStore;
use crate::view::{DeleteKey, TableRow, TrackerView};

/// A record that can be shown as a table row.
pub trait TableEntry: Record {
    /// Column headers, starting with the delete-key column.
    const HEADERS: &'static [&'static str];

    /// Printed before the totals label in text output.
    const TOTAL_CAPTION: &'static str;

    /// Cell texts for this record.
    fn cells(&self) -> Vec<String>;

    /// The delete control for this record at `position` in the collection.
    fn delete_key(&self, position: usize) -> DeleteKey;

    /// Text for the totals label.
    fn total_label(total: f64) -> String;
}

/// Rows for `records`, in collection order.
#[must_use]
pub fn rows<R: TableEntry>(records: &[R]) -> Vec<TableRow> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| TableRow {
            cells: record.cells(),
            delete: record.delete_key(position),
        })
        .collect()
}

/// Replace the view's rows with the stored collection.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn render_table<S, R, V>(collection: &Collection<S, R>, view: &mut V) -> Result<()>
where
    S: KeyValueStore,
    R: TableEntry,
    V: TrackerView + ?Sized,
{
    let records = collection.load()?;
    trace!(key = collection.key(), rows = records.len(), "Rendering table");
    view.render_rows(&rows(&records));
    Ok(())
}

/// Replace the view's totals label with the stored collection's sum.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn render_total<S, R, V>(collection: &Collection<S, R>, view: &mut V) -> Result<()>
where
    S: KeyValueStore,
    R: TableEntry,
    V: TrackerView + ?Sized,
{
    let total = collection.total()?;
    view.render_total(&R::total_label(total));
    Ok(())
}

/// Render table and total.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn render<S, R, V>(collection: &Collection<S, R>, view: &mut V) -> Result<()>
where
    S: KeyValueStore,
    R: TableEntry,
    V: TrackerView + ?Sized,
{
    render_table(collection, view)?;
    render_total(collection, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donation::Donation;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::view::BufferedView;
    use crate::volunteer::VolunteerLog;

    #[test]
    fn test_rows_use_position_for_donations() {
        let donations = vec![
            Donation {
                charity_name: "A".to_string(),
                donation_amount: 5.0,
                donation_date: "2023-10-01".to_string(),
                donor_comment: None,
            },
            Donation {
                charity_name: "B".to_string(),
                donation_amount: 3.0,
                donation_date: "2023-10-02".to_string(),
                donor_comment: Some("thanks".to_string()),
            },
        ];

        let rows = rows(&donations);
        assert_eq!(rows[0].delete, DeleteKey::Index(0));
        assert_eq!(rows[1].delete, DeleteKey::Index(1));
        assert_eq!(rows[1].cells[0], "B");
    }

    #[test]
    fn test_rows_use_id_for_volunteer_logs() {
        let logs = vec![VolunteerLog {
            id: 1_680_307_200_000,
            charity_name: "A".to_string(),
            hours_volunteered: 5.0,
            date: "2023-04-01".to_string(),
            experience_rating: 3,
        }];

        let rows = rows(&logs);
        assert_eq!(rows[0].delete, DeleteKey::Id(1_680_307_200_000));
    }

    #[test]
    fn test_render_empty_store() {
        let store = MemoryStore::new();
        let collection: Collection<_, Donation> = Collection::new(store);
        let mut view = BufferedView::new();

        render(&collection, &mut view).unwrap();
        assert!(view.rows.is_empty());
        assert_eq!(view.total, "0.00");
    }

    #[test]
    fn test_render_reads_store_fresh() {
        let mut store = MemoryStore::new();
        store
            .set_item("volunteerLogs", r#"[{"id":1,"charityName":"A","hoursVolunteered":"4","date":"d","experienceRating":2}]"#)
            .unwrap();
        let collection: Collection<_, VolunteerLog> = Collection::new(store);
        let mut view = BufferedView::new();

        render(&collection, &mut view).unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.total, "Total Hours Volunteered: 4");
    }
}
