// Static lookup tables bundled with the client
pub mod metadata;
pub mod reference_table;

pub use metadata::{LogoChain, LogoSource, MetadataTable, TickerMetadata};
pub use reference_table::ReferenceTable;
