//! log macro's for roster engine logging

/// Writes a debug! message to the app::roster logger
#[macro_export]
macro_rules! roster_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::roster", $($arg)+)
    };
}

/// Writes an info! message to the app::roster logger
#[macro_export]
macro_rules! roster_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::roster", $($arg)+)
    };
}

/// Writes an warn! message to the app::roster logger
#[macro_export]
macro_rules! roster_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::roster", $($arg)+)
    };
}

/// Writes an error! message to the app::roster logger
#[macro_export]
macro_rules! roster_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::roster", $($arg)+)
    };
}
