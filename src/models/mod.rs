pub mod amenity;
pub mod auth;
pub mod place;
pub mod review;
pub mod user;


pub use amenity::*;
pub use auth::*;
pub use place::*;
pub use review::*;
pub use user::*;
