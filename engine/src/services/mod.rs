pub mod analysis;
pub mod backend;
pub mod backend_client;
pub mod favorites;
pub mod news;
pub mod session;
pub mod term_explainer;

pub use analysis::{AnalysisService, InvestorFlowSeries};
pub use backend::GuardianBackend;
pub use backend_client::HttpBackend;
pub use favorites::FavoritesSync;
pub use news::NewsFeed;
pub use session::SessionService;
pub use term_explainer::TermExplainer;
