pub mod date;
pub mod investment;
pub mod price;
pub mod settings;
pub mod symbol;
