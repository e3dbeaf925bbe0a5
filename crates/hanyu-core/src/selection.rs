/// CJK Unified Ideographs block
pub fn is_cjk_unified(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Outcome of checking a selection before any request is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCheck {
    /// Trimmed text that should be translated
    Accepted(String),
    /// Nothing selected
    Ignored,
    NotChinese,
    TooLong { count: usize, max: usize },
}

impl SelectionCheck {
    /// Message for the transient toast, if the user should see one
    pub fn toast_message(&self) -> Option<String> {
        match self {
            SelectionCheck::NotChinese => {
                Some("Please select text that begins with Chinese characters.".to_string())
            }
            SelectionCheck::TooLong { count, max } => Some(format!(
                "Please select fewer characters (maximum {max}).\nCurrent selection: {count} characters"
            )),
            SelectionCheck::Accepted(_) | SelectionCheck::Ignored => None,
        }
    }
}

/// Decide whether a selection qualifies for translation.
///
/// The first character must satisfy `is_script_char` and the trimmed text
/// must be at most `max_chars` characters long.
pub fn check_selection<F>(raw: &str, max_chars: usize, is_script_char: F) -> SelectionCheck
where
    F: Fn(char) -> bool,
{
    let text = raw.trim();
    let Some(first) = text.chars().next() else {
        return SelectionCheck::Ignored;
    };

    if !is_script_char(first) {
        return SelectionCheck::NotChinese;
    }

    let count = text.chars().count();
    if count > max_chars {
        return SelectionCheck::TooLong {
            count,
            max: max_chars,
        };
    }

    SelectionCheck::Accepted(text.to_string())
}
