use std::ffi::OsStr;

/// Characters that get their neighbouring underscores and immediate repeats squeezed out.
/// The order matters: every character is handled once, left to right.
const SPECIAL_CHARS: &str = "!#$%&'()*,-./:;<=>?@[]^_`{|}~";

/// Normalizes a bare file name (no directories) into the lowercase, ASCII-only,
/// underscore-delimited form.
///
/// Returns `None` when nothing usable is left, which callers treat as an empty name.
pub fn normalize_file_name(name: &str) -> Option<String> {
    normalize_bytes(name.as_bytes())
}

/// Same as [`normalize_file_name`], but works on the raw encoded bytes so file names
/// that are not valid UTF-8 still normalize.
pub fn normalize_os_name(name: &OsStr) -> Option<String> {
    normalize_bytes(name.as_encoded_bytes())
}

fn normalize_bytes(raw: &[u8]) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let ascii = strip_non_ascii(raw);
    let collapsed = collapse_runs(&ascii, '_', '_');
    let collapsed = collapse_runs(&collapsed, ' ', '_');

    if collapsed.is_empty() {
        return None;
    }

    let cleaned = squeeze_special_chars(collapsed);
    let trimmed = trim_boundary_underscores(&cleaned);
    let lowered = trimmed.to_ascii_lowercase();
    let finished = substitute_dots(&lowered);

    (!finished.is_empty()).then_some(finished)
}

fn strip_non_ascii(raw: &[u8]) -> String {
    raw.iter()
        .filter(|byte| byte.is_ascii())
        .map(|&byte| byte as char)
        .collect()
}

/// Every maximal run of `target` becomes a single `replacement`.
fn collapse_runs(s: &str, target: char, replacement: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;

    for c in s.chars() {
        if c == target {
            if !in_run {
                out.push(replacement);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

// One scan per rule per character, never repeated until stable.
// "a!!!b" therefore keeps a "!!" after the pass.
fn squeeze_special_chars(mut s: String) -> String {
    for special in SPECIAL_CHARS.chars() {
        let single = special.to_string();

        s = replace_pair(&s, ('_', special), &single);
        s = replace_pair(&s, (special, '_'), &single);
        s = replace_pair(&s, (special, special), &single);
    }

    s
}

/// Replaces non-overlapping occurrences of the two-char `pair`, scanning left to right.
fn replace_pair(s: &str, pair: (char, char), replacement: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == pair.0 && chars.peek() == Some(&pair.1) {
            chars.next();
            out.push_str(replacement);
        } else {
            out.push(c);
        }
    }

    out
}

fn trim_boundary_underscores(s: &str) -> &str {
    let s = s.strip_prefix('_').unwrap_or(s);
    s.strip_suffix('_').unwrap_or(s)
}

fn absorbs_dot(c: char) -> bool {
    c != '.' && c != '_' && SPECIAL_CHARS.contains(c)
}

/// A dot turns into an underscore only between two neighbours that would accept one.
/// Dots on the boundary or next to another special character are dropped.
fn substitute_dots(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();

    chars.iter()
        .enumerate()
        .filter_map(|(i, &c)| {
            if c != '.' {
                return Some(c);
            }

            let prev = i.checked_sub(1).and_then(|j| chars.get(j));
            let next = chars.get(i + 1);

            match (prev, next) {
                (Some(&p), Some(&n)) if !absorbs_dot(p) && !absorbs_dot(n) => Some('_'),
                _ => None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(name: &str) -> String {
        normalize_file_name(name).unwrap_or_default()
    }

    #[test]
    fn test_empty_name_is_not_usable() {
        assert_eq!(normalize_file_name(""), None);
        assert_eq!(normalized(""), "");
    }

    #[test]
    fn test_simple_lowercase() {
        assert_eq!(normalize_file_name("Test"), Some("test".to_string()));
    }

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(normalized("A B C"), "a_b_c");
        assert_eq!(normalized("A  B   C"), "a_b_c");
    }

    #[test]
    fn test_underscore_runs_collapse() {
        assert_eq!(normalized("A__B___C"), "a_b_c");
    }

    #[test]
    fn test_boundary_underscores_are_trimmed() {
        assert_eq!(normalized("_A_B_C_"), "a_b_c");
    }

    #[test]
    fn test_special_chars_pass_through() {
        assert_eq!(normalized("A!B@C#D$E%F^G&H*I(J)K"), "a!b@c#d$e%f^g&h*i(j)k");
    }

    #[test]
    fn test_underscores_around_special_char_are_removed() {
        assert_eq!(normalized("A_!_B"), "a!b");
        assert_eq!(normalized("Track - Live"), "track-live");
    }

    #[test]
    fn test_dots_become_underscores() {
        assert_eq!(normalized("file.name.txt"), "file_name_txt");
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(normalized("file-with-äöü.txt"), "file-with-txt");
        assert_eq!(normalize_file_name("äöü"), None);
    }

    #[test]
    fn test_complex_name() {
        assert_eq!(normalized("  A_B C-D.E F__G  "), "a_b_c-d_e_f_g");
    }

    #[test]
    fn test_only_spaces_and_underscores() {
        assert_eq!(normalize_file_name(" _ "), None);
        assert_eq!(normalize_file_name("___"), None);
    }

    #[test]
    fn test_repeated_special_char_single_pass() {
        assert_eq!(normalized("a!!b"), "a!b");
        // three in a row only loses one per pass
        assert_eq!(normalized("a!!!b"), "a!!b");
    }

    #[test]
    fn test_boundary_dots_are_dropped() {
        assert_eq!(normalized(".bashrc"), "bashrc");
        assert_eq!(normalized("archive."), "archive");
        assert_eq!(normalize_file_name("..."), None);
    }

    #[test]
    fn test_space_runs_next_to_underscores() {
        // spaces and underscores form two separate runs here
        assert_eq!(normalized("_ x"), "x");
        assert_eq!(normalized("Mixed Case.TXT"), "mixed_case_txt");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "Test",
            "A B C",
            "A  B   C",
            "A__B___C",
            "_A_B_C_",
            "A!B@C#D$E%F^G&H*I(J)K",
            "A_!_B",
            "file.name.txt",
            "file-with-äöü.txt",
            "  A_B C-D.E F__G  ",
            "My  File.TXT",
        ];

        for input in inputs {
            let once = normalized(input);
            assert_eq!(normalized(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_os_name_matches_str_name() {
        let name = "My  File.TXT";
        assert_eq!(normalize_os_name(OsStr::new(name)), normalize_file_name(name));
    }

    #[cfg(unix)]
    #[test]
    fn test_os_name_with_invalid_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"Caf\xe9 Menu.pdf");
        assert_eq!(normalize_os_name(name), Some("caf_menu_pdf".to_string()));
    }
}
