//! Model of the day
//!
//! Stateless rotation: the selected position is the day of the year modulo
//! the catalog size, so a given calendar day always maps to the same model
//! until the catalog changes.

use chrono::{Datelike, NaiveDate};

use crate::db::ModelDoc;

/// Position in the ordered catalog for a 1-based day of the year
pub fn daily_index(day_of_year: u32, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    Some(day_of_year as usize % total)
}

/// Pick the model for `date` from a catalog in (section_index, model_index) order
pub fn select_daily(catalog: &[ModelDoc], date: NaiveDate) -> Option<&ModelDoc> {
    daily_index(date.ordinal(), catalog.len()).and_then(|i| catalog.get(i))
}
