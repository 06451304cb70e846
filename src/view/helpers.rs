//! Helpers shared by the listing page

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::storage::DELIMITER;

/// Bytes left unescaped inside a single path segment (RFC 3986 unreserved)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// SI magnitude suffixes
const SIZES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Final path segment of a key, ignoring trailing separators.
///
/// `"a/b/c.txt"` gives `"c.txt"` and `"a/b/"` gives `"b"`. An empty key
/// gives `"."` and a key made only of separators gives `"/"`.
pub fn basename(key: &str) -> &str {
    if key.is_empty() {
        return ".";
    }
    let trimmed = key.trim_end_matches(DELIMITER);
    if trimmed.is_empty() {
        return DELIMITER;
    }
    match trimmed.rfind(DELIMITER) {
        Some(pos) => &trimmed[pos + DELIMITER.len()..],
        None => trimmed,
    }
}

/// Zero-byte placeholder objects some tools create for empty folders
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with(DELIMITER)
}

/// Format a byte count with SI suffixes, e.g. `4096` as `"4.1 kB"`
pub fn humanize_bytes(n: u64) -> String {
    if n < 10 {
        return format!("{} B", n);
    }

    let mut exp = 0;
    let mut scale = 1u64;
    while exp + 1 < SIZES.len() && n / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }

    let val = ((n as f64 / scale as f64) * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 {
        format!("{:.1} {}", val, SIZES[exp])
    } else {
        format!("{:.0} {}", val, SIZES[exp])
    }
}

/// HTML-escape text for element content and attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode one path segment. Separators inside it are encoded too.
pub fn url_escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encode a full key, keeping its separators as path separators
pub fn url_escape_key(key: &str) -> String {
    key.split(DELIMITER)
        .map(url_escape_segment)
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("a/b/"), "b");
        assert_eq!(basename("file.txt"), "file.txt");
        assert_eq!(basename("docs/"), "docs");
        assert_eq!(basename(""), ".");
        assert_eq!(basename("//"), "/");
    }

    #[test]
    fn test_is_directory_marker() {
        assert!(is_directory_marker("docs/"));
        assert!(is_directory_marker("/"));
        assert!(!is_directory_marker("docs"));
        assert!(!is_directory_marker("docs/a.txt"));
        assert!(!is_directory_marker(""));
    }

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(9), "9 B");
        assert_eq!(humanize_bytes(12), "12 B");
        assert_eq!(humanize_bytes(999), "999 B");
        assert_eq!(humanize_bytes(1000), "1.0 kB");
        assert_eq!(humanize_bytes(1024), "1.0 kB");
        assert_eq!(humanize_bytes(4096), "4.1 kB");
        assert_eq!(humanize_bytes(82854982), "83 MB");
        assert_eq!(humanize_bytes(1048576), "1.0 MB");
        assert_eq!(humanize_bytes(u64::MAX), "18 EB");
    }

    #[test]
    fn test_humanize_bytes_monotonic() {
        let samples = [0u64, 5, 10, 999, 1000, 1500, 9_999, 10_000, 999_999, 1_000_000, 5_000_000_000];
        let magnitude = |s: &str| {
            let (num, unit) = s.split_once(' ').unwrap();
            let exp = SIZES.iter().position(|u| *u == unit).unwrap();
            num.parse::<f64>().unwrap() * 1000f64.powi(exp as i32)
        };
        for pair in samples.windows(2) {
            assert!(magnitude(&humanize_bytes(pair[0])) <= magnitude(&humanize_bytes(pair[1])));
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&#34;c&#39;");
        assert_eq!(html_escape("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_url_escape() {
        assert_eq!(url_escape_segment("my file#1.txt"), "my%20file%231.txt");
        assert_eq!(url_escape_segment("a/b"), "a%2Fb");
        assert_eq!(url_escape_key("dir one/a&b.txt"), "dir%20one/a%26b.txt");
        assert_eq!(url_escape_key("caf\u{e9}.txt"), "caf%C3%A9.txt");
    }
}
