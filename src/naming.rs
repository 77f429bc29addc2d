//! Original-name recovery for timestamp-prefixed filenames.
//!
//! Photos are often kept on disk under a sortable name that puts the local
//! capture time in front of the name the camera gave them:
//!
//! ```text
//! 20230101-120000 (IMG_5).JPG
//! └─ date ─┘ └time┘ └rest┘
//! ```
//!
//! The archive, the `Original/` and `Resized/` copies, and the gallery links
//! all use the camera's name again. Anything that does not follow the
//! convention is exported under its on-disk name unchanged.
//!
//! ## Extension casing
//!
//! Cameras name files in capitals. When the recovered name has no lowercase
//! letters the extension is upper-cased to match (`IMG_5.jpg` → `IMG_5.JPG`);
//! otherwise it is left alone. Names made only of digits and symbols count as
//! upper-case, which is naive but matches every camera seen so far.

const DATE_DIGITS: usize = 8;
const TIME_DIGITS: usize = 6;

/// Recover the export name from a bare filename (no directory part).
///
/// - `"20230101-120000 (IMG_5).JPG"` → `"IMG_5.JPG"`
/// - `"20230101-120000 (IMG_5).jpg"` → `"IMG_5.JPG"`
/// - `"20230101-120000 (img5).jpg"` → `"img5.jpg"`
/// - `"photo.png"` → `"photo.png"`
pub fn resolve_original_name(file_name: &str) -> String {
    let (stem, extension) = split_extension(file_name);

    match timestamped_rest(stem) {
        Some(rest) if rest.to_uppercase() == rest => {
            format!("{}{}", rest, extension.to_uppercase())
        }
        Some(rest) => format!("{}{}", rest, extension),
        None => file_name.to_string(),
    }
}

/// Split at the last dot, keeping the dot with the extension.
///
/// `"a.b.jpg"` → `("a.b", ".jpg")`, `"README"` → `("README", "")`.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) => file_name.split_at(dot),
        None => (file_name, ""),
    }
}

/// Match `YYYYMMDD-HHMMSS (<rest>)` and return `<rest>`.
fn timestamped_rest(stem: &str) -> Option<&str> {
    let (_, after_date) = split_digits(stem, DATE_DIGITS)?;
    let after_dash = after_date.strip_prefix('-')?;
    let (_, after_time) = split_digits(after_dash, TIME_DIGITS)?;
    let rest = after_time.strip_prefix(" (")?.strip_suffix(')')?;

    if rest.is_empty() || rest.contains('\n') {
        return None;
    }
    Some(rest)
}

fn split_digits(s: &str, count: usize) -> Option<(&str, &str)> {
    let digits = s.get(..count)?;
    digits
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| s.split_at(count))
}
