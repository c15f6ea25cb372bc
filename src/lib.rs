pub mod codec;
pub mod input;
pub mod io;
pub mod state;
pub mod ui;
