//! UI Components
//!
//! Reusable Leptos components.

mod login_view;
mod dashboard;
mod project_card;
mod project_form;
mod project_page;
mod todo_row;

pub use login_view::LoginView;
pub use dashboard::Dashboard;
pub use project_card::ProjectCardView;
pub use project_form::{ProjectFormModal, ProjectFormState};
pub use project_page::ProjectPage;
pub use todo_row::TodoRow;
