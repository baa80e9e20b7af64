pub mod availability;
pub mod detect;
pub mod hierarchy;
pub mod validate;
pub mod value;
