// SQLite repository implementations, one module per table

pub mod amenities;
pub mod places;
pub mod reviews;
pub mod users;

pub use amenities::SqliteAmenityRepository;
pub use places::SqlitePlaceRepository;
pub use reviews::SqliteReviewRepository;
pub use users::SqliteUserRepository;
