// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract parameters from request
// 2. Perform authentication
// 3. Call the facade
// 4. Transform the domain result to an HTTP response

pub mod amenities;
pub mod auth;
pub mod places;
pub mod reviews;
pub mod users;
