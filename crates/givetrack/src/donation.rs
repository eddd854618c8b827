//! Donation tracking.
//!
//! A donation form is validated, normalized into a [`Donation`], appended to
//! the `donations` collection, and the table and money total are re-rendered.
//! Donations are deleted by their position in the collection.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::collection::{Collection, MalformedPolicy, Record};
use crate::error::{Result, ValidationError};
use crate::numeric::{self, format_money, format_plain, parse_float};
use crate::render::{self, TableEntry};
use crate::store::KeyValueStore;
use crate::view::{DeleteKey, TrackerView};

/// Key the donation collection is stored under.
pub const DONATIONS_KEY: &str = "donations";

/// Shown when a required field is empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Fill out all the fields correctly.";

/// Shown when the amount is not a number or is negative.
pub const INVALID_AMOUNT_MESSAGE: &str = "Donation amount must be a positive number.";

/// Raw donation form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationForm {
    /// Charity the donation went to.
    pub charity_name: String,
    /// Amount as typed.
    pub donation_amount: String,
    /// Date as typed.
    pub donation_date: String,
    /// Free-form comment; never validated.
    pub donor_comment: String,
}

/// A stored donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Charity the donation went to.
    pub charity_name: String,
    /// Non-negative amount.
    #[serde(
        default,
        serialize_with = "numeric::serialize",
        deserialize_with = "numeric::deserialize_lenient"
    )]
    pub donation_amount: f64,
    /// Date as entered.
    pub donation_date: String,
    /// Comment as entered. Always written for new donations; older data may
    /// lack the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_comment: Option<String>,
}

impl Record for Donation {
    const COLLECTION_KEY: &'static str = DONATIONS_KEY;

    fn tally(&self) -> f64 {
        self.donation_amount
    }
}

impl TableEntry for Donation {
    const HEADERS: &'static [&'static str] = &["#", "Charity", "Amount", "Date", "Comment"];
    const TOTAL_CAPTION: &'static str = "Total: ";

    fn cells(&self) -> Vec<String> {
        vec![
            self.charity_name.clone(),
            format_money(self.donation_amount),
            self.donation_date.clone(),
            self.donor_comment.clone().unwrap_or_default(),
        ]
    }

    fn delete_key(&self, position: usize) -> DeleteKey {
        DeleteKey::Index(position)
    }

    fn total_label(total: f64) -> String {
        format_money(total)
    }
}

/// Check a donation form.
///
/// Rules short-circuit: missing required fields are reported before the
/// amount is looked at. Only an empty string counts as missing. The amount is
/// read from its leading number, so `"12abc"` is 12; zero is accepted.
///
/// # Errors
///
/// Returns the first failed rule's message.
pub fn validate(form: &DonationForm) -> std::result::Result<(), ValidationError> {
    let required = [
        &form.charity_name,
        &form.donation_amount,
        &form.donation_date,
    ];
    if required.iter().any(|field| field.is_empty()) {
        return Err(ValidationError::new(MISSING_FIELDS_MESSAGE));
    }

    match parse_float(&form.donation_amount) {
        Some(amount) if amount >= 0.0 => Ok(()),
        _ => Err(ValidationError::new(INVALID_AMOUNT_MESSAGE)),
    }
}

/// Convert a validated form into a [`Donation`].
///
/// Text fields, the comment included, pass through unchanged. An amount
/// that does not parse becomes `0`, which cannot happen after [`validate`].
#[must_use]
pub fn normalize(form: &DonationForm) -> Donation {
    Donation {
        charity_name: form.charity_name.clone(),
        donation_amount: parse_float(&form.donation_amount).unwrap_or(0.0),
        donation_date: form.donation_date.clone(),
        donor_comment: Some(form.donor_comment.clone()),
    }
}

/// Submission and deletion handling for donations.
#[derive(Debug)]
pub struct DonationTracker<S> {
    donations: Collection<S, Donation>,
}

impl<S: KeyValueStore> DonationTracker<S> {
    /// Track donations in `store`.
    pub fn new(store: S) -> Self {
        Self {
            donations: Collection::new(store),
        }
    }

    /// Set how an undecodable stored collection is handled.
    #[must_use]
    pub fn with_policy(mut self, on_malformed: MalformedPolicy) -> Self {
        self.donations = self.donations.with_policy(on_malformed);
        self
    }

    /// The underlying collection.
    pub fn donations(&self) -> &Collection<S, Donation> {
        &self.donations
    }

    /// Handle a form submission.
    ///
    /// On a validation failure the message is shown and nothing is stored.
    /// Otherwise the donation is appended, the form and error region are
    /// cleared, the table and total re-rendered, and the result region
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] for rejected input, or a store error if
    /// the collection cannot be read or written.
    pub fn submit<V: TrackerView + ?Sized>(
        &mut self,
        form: &DonationForm,
        view: &mut V,
    ) -> Result<Donation> {
        if let Err(rejected) = validate(form) {
            view.show_error(rejected.message());
            return Err(rejected.into());
        }

        let donation = normalize(form);
        if let Err(err) = self.donations.append(donation.clone()) {
            error!("Failed to store donation: {err}");
            return Err(err);
        }
        info!(
            charity = %donation.charity_name,
            amount = donation.donation_amount,
            "Donation recorded"
        );

        view.clear_form();
        self.render(view)?;
        view.show_result(&format!(
            "Result of the operation is {}",
            format_plain(donation.donation_amount)
        ));
        view.clear_error();
        Ok(donation)
    }

    /// Delete the donation at `index` and re-render.
    ///
    /// Returns the removed donation, or `None` if `index` is out of range.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn delete<V: TrackerView + ?Sized>(
        &mut self,
        index: usize,
        view: &mut V,
    ) -> Result<Option<Donation>> {
        let removed = self.donations.remove_at(index)?;
        match &removed {
            Some(donation) => info!(index, charity = %donation.charity_name, "Donation deleted"),
            None => info!(index, "No donation at index"),
        }
        self.render(view)?;
        Ok(removed)
    }

    /// Delete every donation and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear<V: TrackerView + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.donations.clear()?;
        self.render(view)
    }

    /// Rebuild the table and money total from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    pub fn render<V: TrackerView + ?Sized>(&self, view: &mut V) -> Result<()> {
        render::render(&self.donations, view)
    }
}
