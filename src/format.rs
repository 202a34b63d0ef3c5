//! Human-readable countdown formatting

/// Text rendered once a countdown has nothing left
pub const DONE: &str = "done";

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

/// Format whole seconds as the largest units needed, e.g. `"1h 1m 1s"`.
///
/// Every unit below the leading one is shown, even when zero
/// (`90000` becomes `"1d 1h 0m 0s"`). Zero seconds yields [`DONE`].
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return DONE.to_string();
    }

    let minutes = seconds / MINUTE;
    let hours = minutes / 60;
    let days = hours / 24;
    let years = days / 365;

    if seconds >= YEAR {
        format!(
            "{}y {}d {}h {}m {}s",
            years,
            days % 365,
            hours % 24,
            minutes % 60,
            seconds % 60
        )
    } else if seconds >= DAY {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if seconds >= HOUR {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if seconds >= MINUTE {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
