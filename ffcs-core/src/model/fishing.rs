//! Fishing-robot (Shifter) reports.
//!
//! The robot reports positions as separate row, column and subwell
//! fields and its times in its own `YYYY-MM-DD HH:MM:SS.fff` format; both
//! are sent on as-is and resolved by the service.

use std::sync::LazyLock;

use garde::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLATE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-P]$").unwrap());
static PLATE_COLUMN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}$").unwrap());
static PLATE_SUBWELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-d]$").unwrap());
static XTAL_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^xtal-(\d+)$").unwrap());

pub const DEFAULT_XTAL_PREFIX: &str = "xtal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShifterReport {
    #[garde(length(min = 1))]
    pub plate_id: String,
    #[garde(pattern(PLATE_ROW))]
    pub plate_row: String,
    #[garde(pattern(PLATE_COLUMN))]
    pub plate_column: String,
    #[garde(pattern(PLATE_SUBWELL))]
    pub plate_subwell: String,
    #[garde(skip)]
    pub time_of_arrival: String,
    #[garde(skip)]
    pub time_of_departure: String,
    /// `H:MM:SS`
    #[garde(skip)]
    pub duration: String,
    #[garde(skip)]
    pub comment: String,
    #[garde(skip)]
    pub xtal_id: String,
    /// Puck barcode.
    #[garde(skip)]
    pub destination_name: String,
    /// Puck position.
    #[garde(skip)]
    pub destination_location: String,
    /// Pin barcode.
    #[garde(skip)]
    pub barcode: String,
    /// Puck type.
    #[garde(skip)]
    pub external_comment: String,
}

impl ShifterReport {
    /// The well label this report refers to, with the column zero-padded to
    /// two digits.
    #[must_use]
    pub fn well_label(&self) -> String {
        let Self {
            plate_row,
            plate_column,
            plate_subwell,
            ..
        } = self;

        format!("{plate_row}{plate_column:0>2}{plate_subwell}")
    }
}

#[must_use]
pub fn xtal_name(prefix: &str, index: u32) -> String {
    format!("{prefix}-{index}")
}

/// `N` for a name of the form `xtal-N`.
#[must_use]
pub fn xtal_number(name: &str) -> Option<u32> {
    XTAL_NAME.captures(name)?.get(1)?.as_str().parse().ok()
}

/// One more than the highest `xtal-N` among `names`, or 1 if there is none.
pub fn next_xtal_number<'a>(names: impl IntoIterator<Item = &'a str>) -> u32 {
    names
        .into_iter()
        .filter_map(xtal_number)
        .max()
        .map_or(1, |n| n.saturating_add(1))
}

/// Body of `update_shifter_fishing_result`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct FishingUpdate {
    #[garde(dive)]
    pub well_shifter_data: ShifterReport,
    #[garde(range(min = 1))]
    pub xtal_name_index: u32,
    #[garde(length(min = 1))]
    pub xtal_name_prefix: String,
}
