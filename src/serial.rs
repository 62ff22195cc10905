//! Serial post-processing and formatting.

use std::sync::Arc;

/// Turns the raw serial into the text placed in the license.
pub type SerialFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Strip line wrapping, whitespace and `=` padding from signing-tool output.
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .collect()
}

/// Lay the serial out in fixed-width columns.
///
/// The serial is cut into groups of `group_size` characters (the last may be
/// shorter); `groups_per_line` groups share a line, separated by a space.
/// A zero for either size leaves the serial untouched.
pub fn wrap_columns(serial: &str, group_size: usize, groups_per_line: usize) -> String {
    if group_size == 0 || groups_per_line == 0 {
        return serial.to_string();
    }

    let chars: Vec<char> = serial.chars().collect();
    let groups: Vec<String> = chars
        .chunks(group_size)
        .map(|c| c.iter().collect())
        .collect();

    groups
        .chunks(groups_per_line)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`SerialFormatter`] that applies [`wrap_columns`].
pub fn columns(group_size: usize, groups_per_line: usize) -> SerialFormatter {
    Arc::new(move |serial| wrap_columns(serial, group_size, groups_per_line))
}
