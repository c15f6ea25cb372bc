pub mod address;
pub mod editor;
pub mod events;
pub mod grid;
pub mod selection;
