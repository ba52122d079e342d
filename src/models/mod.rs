pub mod data;
pub mod layout;
pub mod rules;

pub use data::*;
pub use layout::{FieldSpec, Layout, Slot};
pub use rules::{CorrectionRule, CountryRule, CountryRules};
