pub mod payload;
pub mod view_model;
