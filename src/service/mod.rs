//! Application services: validation and conflict handling between HTTP and persistence.

mod profile;
mod todo;
mod validation;
pub use profile::ProfileService;
pub use todo::TodoService;
pub use validation::ProfileValidator;
