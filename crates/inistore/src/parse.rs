//! Load-time parsing of the line-oriented section/key format.
//!
//! Detection rules are deliberately loose because files already in the wild
//! rely on them: a header is any line containing both bracket characters,
//! an entry is any remaining line containing `=`, everything else is
//! ignored. Keep the rules as they are rather than tightening them.

use std::collections::HashMap;

use crate::error::{IniError, IniResult};

/// Trim set applied to both ends of section names and header lines.
const BRACKETS: &[char] = &['[', ']'];

/// A line is a section header when it contains `[` and `]` anywhere.
/// Header detection runs before entry detection, so a bracketed line that
/// also contains `=` is still a header.
pub(crate) fn is_section_header(line: &str) -> bool {
    line.contains('[') && line.contains(']')
}

/// Normalized section token for a header line or a caller-supplied section
/// name: bracket characters trimmed from both ends, then lowercased.
/// Interior brackets and surrounding whitespace survive.
pub(crate) fn section_token(raw: &str) -> String {
    raw.trim_matches(BRACKETS).to_lowercase()
}

/// Splits an entry line on `=`. The key is everything before the first `=`,
/// untrimmed; the value is the text between the first and second `=`. Any
/// further `=`-separated parts are silently dropped.
pub(crate) fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split('=');
    let key = parts.next()?;
    let value = parts.next()?;
    Some((key, value))
}

/// Lookup token: normalized section concatenated directly with the
/// lowercased key. There is no separator, so section `ab` with key `c`
/// collides with section `a` with key `bc`; that ambiguity is part of the
/// format, not something to repair here.
pub(crate) fn composite_key(section: &str, key: &str) -> String {
    let mut token = section_token(section);
    token.push_str(&key.to_lowercase());
    token
}

/// Builds the lookup mapping from lines, in order. The current section
/// starts empty, so entries above the first header land under the bare key.
/// Two lines collapsing to the same token abort the load.
pub(crate) fn parse_lines<'a, I>(lines: I) -> IniResult<HashMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut items = HashMap::new();
    let mut section = String::new();

    for line in lines {
        if is_section_header(line) {
            section = section_token(line);
        } else if let Some((key, value)) = split_entry(line) {
            let token = format!("{section}{}", key.to_lowercase());
            if items.insert(token.clone(), value.to_string()).is_some() {
                return Err(IniError::DuplicateKey { key: token });
            }
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection_is_loose() {
        assert!(is_section_header("[Server]"));
        assert!(is_section_header("  [Server]  "));
        assert!(is_section_header("db[0]"));
        assert!(is_section_header("[Mode=Fast]"));
        assert!(!is_section_header("[Server"));
        assert!(!is_section_header("Port=8080"));
        assert!(!is_section_header(""));
    }

    #[test]
    fn test_section_token_trims_only_bracket_runs() {
        assert_eq!(section_token("[Server]"), "server");
        assert_eq!(section_token("[[Server]]"), "server");
        // Trimming stops at the first non-bracket character on each end.
        assert_eq!(section_token(" [Server] "), " [server] ");
        assert_eq!(section_token("[a]b]"), "a]b");
    }

    #[test]
    fn test_split_entry_keeps_first_two_parts() {
        assert_eq!(split_entry("Port=8080"), Some(("Port", "8080")));
        assert_eq!(split_entry("empty="), Some(("empty", "")));
        assert_eq!(split_entry("no equals here"), None);
        // Extra `=` parts are dropped, not rejoined.
        assert_eq!(split_entry("conn=a=b=c"), Some(("conn", "a")));
    }

    #[test]
    fn test_composite_key_has_no_separator() {
        assert_eq!(composite_key("Server", "Port"), "serverport");
        assert_eq!(composite_key("[Server]", "Port"), "serverport");
        // The accepted ambiguity of the format.
        assert_eq!(composite_key("ab", "c"), composite_key("a", "bc"));
    }

    #[test]
    fn test_parse_lines_ignores_noise() {
        let lines = ["", "## separator", "just text", "[Server]", "Port=8080"];
        let items = parse_lines(lines).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items["serverport"], "8080");
    }

    #[test]
    fn test_parse_lines_keeps_keys_and_values_untrimmed() {
        let items = parse_lines(["[A]", " Port = 8080 "]).unwrap();
        assert_eq!(items["a port "], " 8080 ");
        assert!(!items.contains_key("aport"));
    }

    #[test]
    fn test_parse_lines_rejects_duplicates() {
        let err = parse_lines(["[A]", "k=1", "k=2"]).unwrap_err();
        assert!(matches!(err, IniError::DuplicateKey { key } if key == "ak"));
    }
}
