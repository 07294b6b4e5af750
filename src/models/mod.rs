pub mod food;
pub mod food_request;
pub mod user;

pub use food::*;
pub use food_request::*;
pub use user::*;
