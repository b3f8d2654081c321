pub mod settings;

pub use settings::{TesseraConfig, CONFIG_FILE};
