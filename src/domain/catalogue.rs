/// Industries offered in the search form.
pub const INDUSTRIES: &[&str] = &[
    "Country Club",
    "Insurance",
    "Non-Profit",
    "Municipalities with Utilities",
    "Property Management",
    "Taxes",
    "Utilities",
];

/// States offered in the search form.
pub const STATES: &[&str] = &[
    "Alabama",
    "Florida",
    "Georgia",
    "Indiana",
    "Kentucky",
    "Maryland",
    "New Jersey",
    "North Carolina",
    "Ohio",
    "Pennsylvania",
    "South Carolina",
    "Tennessee",
    "Texas",
    "Virginia",
    "West Virginia",
    "Washington DC",
];

pub fn is_known_industry(industry: &str) -> bool {
    INDUSTRIES.contains(&industry)
}

pub fn is_known_state(state: &str) -> bool {
    STATES.contains(&state)
}
