use egui::{Color32, Response, Ui};
use taskdeck_utils::version_info;

/// Displays the current environment and version/info in the UI.
///
/// Display format varies by environment:
/// - PR: `pr:{number}`
/// - Prod (stable): `stable:{version}`
/// - Nightly: `nightly:{date}`
/// - Main/Test: `main:{commit}`
pub fn env_version(ui: &mut Ui) -> Response {
    let display_text = version_info::format_env_version();
    let (env_name, _) = version_info::env_version_info();

    // Color based on environment
    let color = match env_name {
        "stable" => Color32::GREEN,
        "nightly" => Color32::from_rgb(255, 165, 0), // Orange
        "pr" => Color32::LIGHT_BLUE,
        "main" => Color32::from_rgb(200, 200, 200), // Light gray
        _ => Color32::WHITE,
    };

    ui.colored_label(color, display_text)
}
