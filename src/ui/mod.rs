pub mod utils;

pub use utils::chat_row;
