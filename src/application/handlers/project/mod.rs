//! Project command and query handlers.

mod create_project;
mod get_project;
mod list_projects;

pub use create_project::{CreateProjectCommand, CreateProjectHandler};
pub use get_project::{GetProjectHandler, GetProjectQuery};
pub use list_projects::{ListProjectsHandler, ListProjectsQuery};
