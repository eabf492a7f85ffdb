pub mod menu_index;
pub mod place;
