pub mod areas;
pub mod health;
pub mod pages;
