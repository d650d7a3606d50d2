// Client configuration
pub mod settings;

pub use settings::ClientSettings;
