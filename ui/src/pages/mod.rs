//! Pages module for the application.
//!
//! One render function per route:
//! - `login_page`: sign-in / sign-up forms for anonymous users
//! - `tasks_page`: paginated task table, the landing page after sign-in
//! - `task_form_page`: create and edit form for a single task
//! - `profile_page`: name and password settings for the signed-in user
//! - `admin_dashboard_page`: aggregate counters, admin only
//! - `admin_users_page`: user management table, admin only
//! - `admin_user_edit_page`: role and status form for one user, admin only

mod admin_dashboard_page;
mod admin_user_edit_page;
mod admin_users_page;
mod login_page;
mod profile_page;
mod task_form_page;
mod tasks_page;

pub use admin_dashboard_page::admin_dashboard_page;
pub use admin_user_edit_page::admin_user_edit_page;
pub use admin_users_page::{USERS_PAGE_SIZE, admin_user_table_columns, admin_users_page};
pub use login_page::login_page;
pub use profile_page::profile_page;
pub use task_form_page::task_form_page;
pub use tasks_page::{task_table_columns, tasks_page};
