//! `--color`/`--no-color` and the `NO_COLOR`/`CLICOLOR` conventions.
//!
//! See <https://no-color.org/> and <https://bixense.com/clicolors/>.

/// Decides whether to force colors on or off. `None` leaves the choice to
/// the `colored` crate's TTY detection.
///
/// Flags beat the environment; `NO_COLOR` (any value) beats
/// `CLICOLOR_FORCE` (non-empty, not `0`), which beats `CLICOLOR=0`.
pub fn choice(
    force_color: bool,
    no_color: bool,
    env: impl Fn(&str) -> Option<String>,
) -> Option<bool> {
    if force_color {
        return Some(true);
    }
    if no_color || env("NO_COLOR").is_some() {
        return Some(false);
    }
    match env("CLICOLOR_FORCE") {
        Some(force) if !force.is_empty() && force != "0" => Some(true),
        Some(_) => None,
        None => (env("CLICOLOR").as_deref() == Some("0")).then_some(false),
    }
}

/// Applies [`choice`] for the current process environment.
pub fn configure(force_color: bool, no_color: bool) {
    let env = |name: &str| std::env::var_os(name).map(|value| value.to_string_lossy().into_owned());
    if let Some(enabled) = choice(force_color, no_color, env) {
        colored::control::set_override(enabled);
    }
}
