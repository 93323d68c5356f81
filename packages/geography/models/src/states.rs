//! U.S. state name utilities.
//!
//! Reverse geocoders report full state names ("California") while
//! configuration is usually written with postal abbreviations ("CA").
//! These helpers map between the two for the 50 states + DC.

/// `(abbreviation, full name)` pairs for the 50 states + DC.
pub const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Maps a full state name to its two-letter abbreviation.
///
/// Matching is case-insensitive. Returns `None` for unrecognized names.
#[must_use]
pub fn name_to_abbr(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(name))
        .map(|(abbr, _)| *abbr)
}

/// Maps a two-letter abbreviation to the full state name.
///
/// Matching is case-insensitive. Returns `None` for unrecognized codes.
#[must_use]
pub fn abbr_to_name(abbr: &str) -> Option<&'static str> {
    let abbr = abbr.trim();
    STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbr))
        .map(|(_, full)| *full)
}

/// Normalizes either form ("ca", "California") to the abbreviation.
#[must_use]
pub fn canonical_abbr(state: &str) -> Option<&'static str> {
    abbr_to_name(state)
        .and_then(name_to_abbr)
        .or_else(|| name_to_abbr(state))
}
