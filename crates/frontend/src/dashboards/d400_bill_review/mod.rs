pub mod dropdown;
pub mod filter;
pub mod render;
pub mod ui;
pub mod view_model;
