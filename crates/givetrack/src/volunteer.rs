//! Volunteer-hours tracking.
//!
//! Same flow as donations, with three differences: both validation rules
//! are always checked and their messages concatenated, each log gets a
//! millisecond-timestamp id, and logs are deleted by that id. The star
//! rating is explicit state owned by the tracker and reset after every
//! stored submission.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::collection::{Collection, MalformedPolicy, Record};
use crate::error::{Result, ValidationError};
use crate::numeric::{self, format_plain, parse_float};
use crate::render::{self, TableEntry};
use crate::store::KeyValueStore;
use crate::view::{DeleteKey, TrackerView};

/// Key the volunteer log collection is stored under.
pub const VOLUNTEER_LOGS_KEY: &str = "volunteerLogs";

/// Appended when a field is missing or no rating is selected.
pub const INCOMPLETE_MESSAGE: &str = "Please complete all fields properly.\n";

/// Appended when hours are zero or negative.
pub const NON_POSITIVE_HOURS_MESSAGE: &str = "Hours should be more than 0.\n";

/// Highest experience rating.
pub const MAX_RATING: u8 = 5;

/// The star rating currently selected on the form. `0` means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSelection {
    selected: u8,
}

impl RatingSelection {
    /// An unset selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the star at zero-based `index`, filling it and every star before it.
    ///
    /// Returns `false` and leaves the selection unchanged when there is no
    /// such star.
    pub fn select_star(&mut self, index: usize) -> bool {
        match index.checked_add(1).map(u8::try_from) {
            Some(Ok(rating)) if rating <= MAX_RATING => {
                self.selected = rating;
                true
            }
            _ => false,
        }
    }

    /// The selected rating, `0` when unset.
    #[must_use]
    pub fn current(&self) -> u8 {
        self.selected
    }

    /// Whether no star is selected.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.selected == 0
    }

    /// Whether the star at zero-based `index` is filled.
    #[must_use]
    pub fn is_filled(&self, index: usize) -> bool {
        index < usize::from(self.selected)
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

/// Raw volunteer form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerForm {
    /// Charity volunteered for.
    pub charity_name: String,
    /// Hours as typed.
    pub hours_volunteered: String,
    /// Date as typed.
    pub date: String,
}

/// A stored volunteer log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerLog {
    /// Millisecond timestamp id, unique within the collection.
    pub id: i64,
    /// Charity volunteered for.
    pub charity_name: String,
    /// Hours volunteered, greater than zero.
    #[serde(
        default,
        serialize_with = "numeric::serialize",
        deserialize_with = "numeric::deserialize_lenient"
    )]
    pub hours_volunteered: f64,
    /// Date as entered.
    pub date: String,
    /// Rating from 1 to 5.
    pub experience_rating: u8,
}

impl Record for VolunteerLog {
    const COLLECTION_KEY: &'static str = VOLUNTEER_LOGS_KEY;

    fn tally(&self) -> f64 {
        self.hours_volunteered
    }
}

impl TableEntry for VolunteerLog {
    const HEADERS: &'static [&'static str] = &["ID", "Charity", "Hours", "Date", "Rating"];
    const TOTAL_CAPTION: &'static str = "";

    fn cells(&self) -> Vec<String> {
        vec![
            self.charity_name.clone(),
            format_plain(self.hours_volunteered),
            self.date.clone(),
            format!("{} / {MAX_RATING}", self.experience_rating),
        ]
    }

    fn delete_key(&self, _position: usize) -> DeleteKey {
        DeleteKey::Id(self.id)
    }

    fn total_label(total: f64) -> String {
        format!("Total Hours Volunteered: {}", format_plain(total))
    }
}

/// How the hours field reads.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hours {
    /// Nothing typed; an empty numeric field reads as zero.
    Blank,
    Number(f64),
    NotANumber,
}

impl Hours {
    fn read(text: &str) -> Self {
        if text.is_empty() {
            Self::Blank
        } else {
            parse_float(text).map_or(Self::NotANumber, Self::Number)
        }
    }

    fn value(self) -> Option<f64> {
        match self {
            Self::Number(hours) => Some(hours),
            Self::Blank | Self::NotANumber => None,
        }
    }

    fn is_positive(self) -> Option<bool> {
        match self {
            Self::Blank => Some(false),
            Self::Number(hours) => Some(hours > 0.0),
            Self::NotANumber => None,
        }
    }
}

/// Check a volunteer form against the selected `rating`.
///
/// Both rules are evaluated. Hours are read from their leading number
/// (`"5 hours"` is 5). Hours with no leading number only fail the
/// completeness rule; empty hours fail both. The charity name is trimmed
/// before the emptiness check, the date is not.
///
/// # Errors
///
/// Returns the concatenated messages of every failed rule.
pub fn validate(form: &VolunteerForm, rating: u8) -> std::result::Result<(), ValidationError> {
    let hours = Hours::read(&form.hours_volunteered);
    let mut message = String::new();

    if form.charity_name.trim().is_empty()
        || hours.value().is_none()
        || form.date.is_empty()
        || rating == 0
    {
        message.push_str(INCOMPLETE_MESSAGE);
    }

    if hours.is_positive() == Some(false) {
        message.push_str(NON_POSITIVE_HOURS_MESSAGE);
    }

    if message.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(message))
    }
}

/// Convert a validated form into a [`VolunteerLog`] with the given `id`.
///
/// The charity name is trimmed. Hours that do not parse become `0`, which
/// cannot happen after [`validate`].
#[must_use]
pub fn normalize(form: &VolunteerForm, rating: u8, id: i64) -> VolunteerLog {
    VolunteerLog {
        id,
        charity_name: form.charity_name.trim().to_string(),
        hours_volunteered: parse_float(&form.hours_volunteered).unwrap_or(0.0),
        date: form.date.clone(),
        experience_rating: rating,
    }
}

/// Id for a new log created at `now_millis`.
///
/// Uses the timestamp unless an existing id is equal or later, in which case
/// it is one past the largest existing id.
#[must_use]
pub fn next_log_id(now_millis: i64, existing: &[VolunteerLog]) -> i64 {
    existing
        .iter()
        .map(|log| log.id)
        .max()
        .map_or(now_millis, |largest| now_millis.max(largest.saturating_add(1)))
}

/// Submission and deletion handling for volunteer logs.
#[derive(Debug)]
pub struct VolunteerTracker<S, C = SystemClock> {
    logs: Collection<S, VolunteerLog>,
    clock: C,
    rating: RatingSelection,
}

impl<S: KeyValueStore> VolunteerTracker<S> {
    /// Track volunteer logs in `store`, stamping ids from the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> VolunteerTracker<S, C> {
    /// Track volunteer logs in `store`, stamping ids from `clock`.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            logs: Collection::new(store),
            clock,
            rating: RatingSelection::new(),
        }
    }

    /// Set how an undecodable stored collection is handled.
    #[must_use]
    pub fn with_policy(mut self, on_malformed: MalformedPolicy) -> Self {
        self.logs = self.logs.with_policy(on_malformed);
        self
    }

    /// The underlying collection.
    pub fn logs(&self) -> &Collection<S, VolunteerLog> {
        &self.logs
    }

    /// The current star selection.
    pub fn rating(&self) -> RatingSelection {
        self.rating
    }

    /// Select the star at zero-based `index`.
    ///
    /// Returns `false` if there is no such star.
    pub fn select_star(&mut self, index: usize) -> bool {
        self.rating.select_star(index)
    }

    /// Handle a form submission using the current star selection.
    ///
    /// On a validation failure the messages are shown and nothing is stored.
    /// Otherwise the log is appended, the table and total re-rendered, and
    /// the form, error region and star selection reset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] for rejected input, or a store
    /// error if the collection cannot be read or written.
    pub fn submit<V: TrackerView + ?Sized>(
        &mut self,
        form: &VolunteerForm,
        view: &mut V,
    ) -> Result<VolunteerLog> {
        let rating = self.rating.current();
        if let Err(rejected) = validate(form, rating) {
            view.show_error(rejected.message());
            return Err(rejected.into());
        }

        let now = self.clock.now_millis();
        let stored = self
            .logs
            .append_with(|existing| normalize(form, rating, next_log_id(now, existing)));
        let log = match stored {
            Ok(log) => log,
            Err(err) => {
                error!("Failed to store volunteer log: {err}");
                return Err(err);
            }
        };
        info!(
            id = log.id,
            charity = %log.charity_name,
            hours = log.hours_volunteered,
            "Volunteer log recorded"
        );

        self.render(view)?;
        view.clear_form();
        view.clear_error();
        self.rating.reset();
        Ok(log)
    }

    /// Delete the log with `id` and re-render.
    ///
    /// Returns how many logs were removed (0 when the id is unknown).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn delete<V: TrackerView + ?Sized>(&mut self, id: i64, view: &mut V) -> Result<usize> {
        let removed = self.logs.remove_where(|log| log.id == id)?;
        info!(id, removed, "Volunteer log delete");
        self.render(view)?;
        Ok(removed)
    }

    /// Delete every log and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear<V: TrackerView + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.logs.clear()?;
        self.render(view)
    }

    /// Rebuild the table and hours total from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    pub fn render<V: TrackerView + ?Sized>(&self, view: &mut V) -> Result<()> {
        render::render(&self.logs, view)
    }
}
