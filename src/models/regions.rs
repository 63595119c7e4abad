//! Static lookup from canonical state name to USPS code.
//!
//! Only the 50 states and the District of Columbia are tracked. Territories
//! are left out on purpose: the map has no shapes for them, so callers treat
//! an absent code as "exclude this row".

use std::collections::HashMap;

const REGION_CODES: [(&str, &str); 51] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

lazy_static::lazy_static! {
    static ref NAME_TO_CODE: HashMap<&'static str, &'static str> =
        REGION_CODES.iter().copied().collect();
    static ref CODE_TO_NAME: HashMap<&'static str, &'static str> =
        REGION_CODES.iter().map(|&(name, code)| (code, name)).collect();
}

/// Code for a canonical region name. Matching is exact.
pub fn lookup(name: &str) -> Option<&'static str> {
    NAME_TO_CODE.get(name).copied()
}

/// Canonical name for a code, case-insensitive.
pub fn name_for_code(code: &str) -> Option<&'static str> {
    CODE_TO_NAME.get(code.to_uppercase().as_str()).copied()
}

/// All supported region names, alphabetical.
pub fn supported_regions() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGION_CODES.iter().map(|&(name, _)| name).collect();
    names.sort_unstable();
    names
}
