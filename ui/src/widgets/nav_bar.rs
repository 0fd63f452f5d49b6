//! Navigation bar rendered inside the top menu bar.

use egui::Ui;
use taskdeck_business::Route;
use taskdeck_business::auth::{AuthCompute, SignOutCommand};
use taskdeck_states::StateCtx;

/// App title, route links and the sign out control. Before sign-in only the
/// title renders; the admin links only show for admin users.
pub fn nav_bar(state_ctx: &mut StateCtx, ui: &mut Ui) {
    ui.strong("Taskdeck");
    ui.separator();

    let signed_in = state_ctx
        .cached::<AuthCompute>()
        .filter(|compute| compute.is_authenticated())
        .and_then(|compute| {
            compute
                .user()
                .map(|user| (user.name.clone(), compute.is_admin()))
        });
    let Some((user_name, is_admin)) = signed_in else {
        return;
    };

    let route = state_ctx.state::<Route>().clone();
    let mut target: Option<Route> = None;

    let on_tasks = matches!(route, Route::Tasks | Route::TaskNew | Route::TaskEdit(_));
    if ui.selectable_label(on_tasks, "Tasks").clicked() {
        target = Some(Route::Tasks);
    }
    if ui
        .selectable_label(route == Route::Profile, "Profile")
        .clicked()
    {
        target = Some(Route::Profile);
    }
    if is_admin {
        if ui
            .selectable_label(route == Route::Admin, "Dashboard")
            .clicked()
        {
            target = Some(Route::Admin);
        }
        let on_users = matches!(route, Route::AdminUsers | Route::AdminUserEdit(_));
        if ui.selectable_label(on_users, "Users").clicked() {
            target = Some(Route::AdminUsers);
        }
    }

    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if ui.button("Sign out").clicked() {
            state_ctx.dispatch::<SignOutCommand>();
        }
        ui.label(user_name);
    });

    if let Some(route) = target {
        state_ctx.update::<Route>(|current| *current = route);
    }
}
