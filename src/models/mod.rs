pub mod controller;
pub mod wear;
