mod booking;
mod user;
mod villa;

pub use booking::*;
pub use user::*;
pub use villa::*;
