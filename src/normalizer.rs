/// Transformations applied to raw source text before either mode
/// operates on it. All flags are monotonic removals, so normalizing
/// twice with the same options is a no-op the second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// Drop every character that is not alphanumeric, `_`, whitespace,
    /// or a period.
    pub strip_punctuation: bool,
    /// Permissive variant of `strip_punctuation`: commas survive too.
    pub keep_commas: bool,
    /// Drop all literal `.` characters, independently of
    /// `strip_punctuation`.
    pub strip_periods: bool,
    pub lowercase: bool,
}

impl NormalizeOptions {
    /// Options derived from typing-mode preferences, where the flags
    /// are phrased as "include X" rather than "strip X".
    pub fn from_typing_prefs(
        include_periods: bool,
        include_punctuation: bool,
        include_capitalization: bool,
    ) -> Self {
        Self {
            strip_punctuation: !include_punctuation,
            keep_commas: false,
            strip_periods: !include_periods,
            lowercase: !include_capitalization,
        }
    }
}

fn is_kept_with_punctuation_stripped(c: char, keep_commas: bool) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || c == '.' || (keep_commas && c == ',')
}

/// Produce the canonical text both engines run against.
///
/// Newlines never survive: each run of `\r`/`\n` plus any spaces
/// around it collapses to a single space, and runs of multiple spaces
/// (which stripping can create) collapse too. Pure and total; an
/// empty input yields an empty output.
pub fn normalize(raw: &str, opts: NormalizeOptions) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        if opts.strip_punctuation && !is_kept_with_punctuation_stripped(c, opts.keep_commas) {
            continue;
        }
        if opts.strip_periods && c == '.' {
            continue;
        }
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        if opts.lowercase {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    collapse_spaces(&out)
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}
