// src/system/quote.rs

//! POSIX shell quoting.

/// Quotes `raw` as a single POSIX shell word that evaluates back to exactly `raw`.
///
/// The value is wrapped in single quotes and every embedded `'` becomes `'\''`
/// (close quoting, escaped quote, reopen). Nothing else is special inside single
/// quotes, so `$`, backticks, spaces and newlines pass through untouched.
/// An empty string becomes `''`.
///
/// Any value interpolated into a command string must go through this function.
pub fn quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('\'');
    for ch in raw.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn echo_through_shell(value: &str) -> String {
        let output = Command::new("/bin/sh")
            .arg("-c")
            .arg(format!("printf '%s' {}", quote(value)))
            .output()
            .unwrap();
        String::from_utf8(output.stdout).unwrap()
    }

    #[test]
    fn test_quote_plain_and_empty() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_quote_embedded_single_quotes() {
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote("''"), r"''\'''\'''");
    }

    #[test]
    fn test_quote_round_trips_through_shlex() {
        for value in ["it's a 'test'", "$(rm -rf /)", "a b\tc", "`id`", "\"dq\"", "new\nline"] {
            let words = shlex::split(&quote(value)).unwrap();
            assert_eq!(words, vec![value.to_string()], "value: {:?}", value);
        }
    }

    #[test]
    fn test_quote_round_trips_through_real_shell() {
        for value in ["it's a 'test'", "", "$(rm -rf /)", "$HOME `id` ; | & > <", "'"] {
            assert_eq!(echo_through_shell(value), value);
        }
    }
}
