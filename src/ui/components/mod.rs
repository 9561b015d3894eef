pub mod popup;
pub mod status;
pub mod text_input;
