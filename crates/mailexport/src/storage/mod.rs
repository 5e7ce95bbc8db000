pub mod attachments;
pub mod filesystem;

pub use attachments::save_attachments;
pub use filesystem::{create_directory, ensure_directory, write_text_file};
