mod auth;
mod history;

pub use auth::TokenManager;
pub use history::HistoryBook;
pub use history::HistoryError;
pub use history::HistoryManager;
pub use history::SaveOutcome;
