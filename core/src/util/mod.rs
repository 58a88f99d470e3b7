pub mod onetimevalue;
pub mod safemap;
pub use onetimevalue::OneTimeValue;
pub use safemap::SafeMap;

/// Formats a lifecycle step log with consistent styling.
/// First argument is the component performing the step (in bold blue)
/// Second argument is the step name (in green)
/// Remaining arguments are formatted as additional context (dimmed)
#[macro_export]
macro_rules! step_info {
    ($thing:expr, $step:expr) => {
        tracing::info!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m", $thing, $step)
    };
    ($thing:expr, $step:expr, $($arg:expr),+) => {
        tracing::info!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m \x1b[2m{}\x1b[0m", $thing, $step, format!("{}", format_args!($($arg),+)))
    };
}

#[macro_export]
macro_rules! step_debug {
    ($thing:expr, $step:expr) => {
        tracing::debug!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m", $thing, $step)
    };
    ($thing:expr, $step:expr, $($arg:expr),+) => {
        tracing::debug!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m \x1b[2m{}\x1b[0m", $thing, $step, format!("{}", format_args!($($arg),+)))
    };
}

#[macro_export]
macro_rules! step_warn {
    ($thing:expr, $step:expr) => {
        tracing::warn!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m", $thing, $step)
    };
    ($thing:expr, $step:expr, $($arg:expr),+) => {
        tracing::warn!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m \x1b[2m{}\x1b[0m", $thing, $step, format!("{}", format_args!($($arg),+)))
    };
}
