//! Data Transfer Objects (DTOs) for the reporting and command surface

mod mappers;
mod requests;
mod responses;

pub use requests::*;
pub use responses::*;
