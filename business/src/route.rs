//! Route state for page navigation.
//!
//! This module defines the route enum that determines which page to display.

use serde::{Deserialize, Serialize};
use std::any::Any;
use taskdeck_states::State;

/// Represents the current page/route of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Login page - shown when no user is signed in
    #[default]
    Login,
    /// Task list - the landing page after sign-in
    Tasks,
    /// Task creation form
    TaskNew,
    /// Task edit form for the task with this id
    TaskEdit(i64),
    /// Profile page for the signed-in user
    Profile,
    /// Admin dashboard with aggregate counters
    Admin,
    /// Admin user management table
    AdminUsers,
    /// Admin edit form for the user with this id
    AdminUserEdit(i64),
}

impl Route {
    /// Everything except the login page needs a signed-in user.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Pages only an admin account may open.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Route::Admin | Route::AdminUsers | Route::AdminUserEdit(_)
        )
    }

    /// Label shown in the navigation bar for the active page.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Tasks => "Tasks",
            Route::TaskNew => "New Task",
            Route::TaskEdit(_) => "Edit Task",
            Route::Profile => "Profile",
            Route::Admin => "Dashboard",
            Route::AdminUsers => "Users",
            Route::AdminUserEdit(_) => "Edit User",
        }
    }
}

impl State for Route {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
