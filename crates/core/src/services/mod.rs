pub mod calculator;
pub mod repository;
pub mod shared_repository;
