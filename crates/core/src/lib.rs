pub mod model;
pub mod validation;

pub use model::{BoxRecord, NewBox};
pub use validation::{MAX_COLOR_LENGTH, MAX_DIMENSION, MIN_DIMENSION, ValidationError, validate};
