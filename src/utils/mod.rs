pub mod card;
pub mod sanitize;
