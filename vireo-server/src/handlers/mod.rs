pub mod feed;
pub mod social;
pub mod uploads;
pub mod users;
pub mod videos;
pub mod views;
