pub mod bootcamp;
pub mod user;

pub use bootcamp::{Bootcamp, BootcampChanges, NewBootcamp};
pub use user::{NewUser, ResetToken, User, UserChanges};
