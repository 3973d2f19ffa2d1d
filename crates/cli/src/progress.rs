use crate::OutputOptions;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Detect if we're running in a CI environment
fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Starts a spinner on stderr. Hidden in CI, with `--quiet`, and when
/// progress output is disabled.
pub fn spinner(message: &str, options: OutputOptions) -> ProgressBar {
    if !options.show_progress || is_ci() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        Ok(style) => pb.set_style(style),
        Err(e) => tracing::debug!(error = %e, "Falling back to the default spinner style"),
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
