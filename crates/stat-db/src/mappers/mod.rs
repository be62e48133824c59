//! Entity to model mappers
//!
//! `From<Model> for Entity` conversions from database rows to domain objects.

mod icon;
mod settings;
mod stat;
