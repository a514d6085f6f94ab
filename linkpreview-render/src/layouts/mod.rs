pub mod compact;
pub mod image_only;
pub mod og_standard;
