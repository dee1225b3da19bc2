use crate::schema::Cell;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Currency glyphs and separators stripped before numeric parsing: the Rupee
/// sign, the dollar sign, thousands-separator commas, and whitespace.
static CURRENCY_GLYPHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[₹$,\s]").unwrap());

/// Recognized date layouts, tried in order. The source locale writes the day
/// before the month, so day-first layouts come first; ISO is accepted as a
/// last resort for sheets that were exported programmatically.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%Y-%m-%d",
];

/// Outcome of a single monetary-cell parse.
///
/// All three variants collapse to a number at the dataset boundary, but the
/// distinction stays observable so "genuinely zero" and "defaulted because
/// the cell was unusable" can be told apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountParse {
    Parsed(f64),
    /// Blank, whitespace-only, or stripped down to nothing.
    Empty,
    /// Non-numeric leftovers after stripping; treated as unknown, not fatal.
    Malformed,
}

impl AmountParse {
    /// Collapses to the dataset-boundary default: unusable cells become zero.
    pub fn or_zero(self) -> f64 {
        match self {
            AmountParse::Parsed(v) => v,
            AmountParse::Empty | AmountParse::Malformed => 0.0,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, AmountParse::Parsed(_))
    }
}

/// Coerces a raw cell into a monetary amount.
///
/// Strips currency glyphs and grouping commas, honors the accounting
/// convention of parentheses for negatives, and never fails: malformed input
/// is reported as [`AmountParse::Malformed`] rather than an error.
pub fn normalize_amount(cell: &Cell) -> AmountParse {
    match cell {
        Cell::Number(n) => AmountParse::Parsed(*n),
        Cell::Empty => AmountParse::Empty,
        Cell::Text(s) => normalize_amount_str(s),
    }
}

pub fn normalize_amount_str(raw: &str) -> AmountParse {
    if raw.trim().is_empty() {
        return AmountParse::Empty;
    }

    let stripped = CURRENCY_GLYPHS.replace_all(raw, "");

    // "(1,234.50)" means -1234.50.
    let candidate = if stripped.len() >= 2 && stripped.starts_with('(') && stripped.ends_with(')') {
        format!("-{}", &stripped[1..stripped.len() - 1])
    } else {
        stripped.into_owned()
    };

    if candidate.is_empty() {
        return AmountParse::Empty;
    }

    match candidate.parse::<f64>() {
        Ok(v) => AmountParse::Parsed(v),
        Err(_) => AmountParse::Malformed,
    }
}

/// Parses a date cell with day-before-month ordering. Returns `None` for
/// anything unparseable; never raises.
pub fn normalize_date(cell: &Cell) -> Option<NaiveDate> {
    let text = cell.as_text()?.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Title-cases a string the way the source sheets expect their categorical
/// labels: first letter of every word uppercased, the rest lowercased, word
/// boundaries at any non-alphabetic character.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

/// Normalizes a categorical cell (statuses, payment modes): trimmed and
/// title-cased, with blank cells mapping to the literal `"Unknown"`.
pub fn normalize_categorical(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "Unknown".to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => title_case(s.trim()),
    }
}

/// Normalizes a free-text cell: trimmed only. Case carries meaning here
/// (acronyms in client names), so no case transform is applied.
pub fn normalize_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s.trim().to_string(),
    }
}
