//! In-memory persistence
//!
//! Thread-safe stores keyed by id. Uniqueness rules (user email, one
//! application per user and vacancy) are enforced inside the write lock so
//! concurrent duplicates surface as conflicts, never double inserts.

pub mod applications;
pub mod users;
pub mod vacancies;

pub use applications::ApplicationStore;
pub use users::UserStore;
pub use vacancies::VacancyStore;
