pub mod availability;
pub mod booking;
pub mod cookbooks;
pub mod email;
pub mod errors;
pub mod seeder;
pub mod services;
pub mod traits;
