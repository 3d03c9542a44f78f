//! Interactive user prompting

use std::io::{self, Write};

use crate::error::Result;

/// Prompt user for yes/no confirmation
///
/// Returns `true` only for 'y' or 'yes' (any case). End of input counts as no.
///
/// # Example
/// ```no_run
/// # use rifa::commands::interactive::confirm;
/// if confirm("Buy 3 tickets").unwrap() {
///     // submit the purchase
/// }
/// ```
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{}? [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

pub(crate) fn is_yes(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
