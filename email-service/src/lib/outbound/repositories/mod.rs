pub mod history;
pub mod user;

pub use history::PostgresEmailHistoryRepository;
pub use user::PostgresUserRepository;
