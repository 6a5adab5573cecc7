pub mod connection;
pub mod errors;
pub mod memory;
pub mod queries;
pub mod repository;
pub mod schema;


pub use connection::*;
pub use errors::*;
pub use memory::InMemoryRepository;
pub use repository::*;
