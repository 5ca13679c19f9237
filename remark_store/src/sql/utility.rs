use itertools::Itertools;

use super::SqlArgumentStyle;

/// Gets the placeholder for the argument at 1-based position `argument`.
pub fn get_argument_parameter(style: &SqlArgumentStyle, argument: usize) -> String {
    match style {
        SqlArgumentStyle::Indexed { prefix } => {
            format!("{prefix}{argument}")
        }
        SqlArgumentStyle::Positional { symbol } => symbol.clone(),
    }
}

/// Gets comma separated placeholders for `count` arguments following the
/// first `offset` arguments.
pub fn get_argument_list(style: &SqlArgumentStyle, offset: usize, count: usize) -> String {
    (offset + 1..=offset + count)
        .map(|argument| get_argument_parameter(style, argument))
        .join(", ")
}
