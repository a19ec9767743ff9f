//! Human-readable time formatting
//!
//! Cue-style offsets for logs and CLI output. Machine-facing output keeps
//! raw f64 seconds; this module is display only.

/// Format a mix offset as a cue timestamp.
///
/// Offsets under one hour render as `MM:SS`; longer offsets as `H:MM:SS`.
/// Fractional seconds round to the nearest whole second.
///
/// # Examples
///
/// ```
/// use mixtrace_common::human_time::format_cue;
///
/// assert_eq!(format_cue(0.0), "00:00");
/// assert_eq!(format_cue(65.4), "01:05");
/// assert_eq!(format_cue(305.0), "05:05");
/// assert_eq!(format_cue(3_725.0), "1:02:05");
/// ```
pub fn format_cue(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}
