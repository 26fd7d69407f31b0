//! Feature engineering for the passenger table
//!
//! Derives per-row features from raw passenger columns:
//! - Honorific title parsed from the passenger name
//! - Ticket prefix and ticket length
//! - Family size and family-size bucket

mod passenger;

pub use passenger::{
    clean_data, extract_title, family_size, ticket_len, ticket_prefix, FamilyType, FeatureBuilder,
};

/// Column names of the passenger table
pub mod columns {
    pub const SURVIVED: &str = "Survived";
    pub const NAME: &str = "Name";
    pub const TICKET: &str = "Ticket";
    pub const SIBSP: &str = "SibSp";
    pub const PARCH: &str = "Parch";
    pub const FARE: &str = "Fare";
    pub const PCLASS: &str = "Pclass";
    pub const EMBARKED: &str = "Embarked";

    pub const TITLE: &str = "Title";
    pub const TICKET_2LETTER: &str = "Ticket_2letter";
    pub const TICKET_LEN: &str = "Ticket_len";
    pub const FAM_SIZE: &str = "Fam_size";
    pub const FAM_TYPE: &str = "Fam_type";

    /// Columns that must be present before features can be derived
    pub const REQUIRED_INPUTS: [&str; 4] = [NAME, TICKET, SIBSP, PARCH];

    /// Columns appended by the feature builder, in order
    pub const DERIVED: [&str; 5] = [TITLE, TICKET_2LETTER, TICKET_LEN, FAM_SIZE, FAM_TYPE];
}
