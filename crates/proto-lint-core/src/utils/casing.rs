//! Identifier casing checks and conversions.
//!
//! Both the check message and the fix of a naming rule call [`Casing::convert`],
//! so the suggestion quoted to the user is exactly the text a fix writes.
//!
//! Words are split on any non-ASCII-alphanumeric character and on case
//! boundaries. A run of uppercase letters stays one word (`RPC_name` →
//! `RPC`, `name`), except that the last capital of a run followed by a
//! lowercase letter begins the next word (`HTTPServer` → `HTTP`, `Server`).

/// Target casing of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Casing {
    /// `UpperCamelCase`
    UpperCamel,
    /// `lowerCamelCase`
    LowerCamel,
    /// `lower_snake_case`
    LowerSnake,
    /// `UPPER_SNAKE_CASE`
    UpperSnake,
}

impl Casing {
    /// Returns true if `name` already satisfies this casing.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::UpperCamel => is_upper_camel_case(name),
            Self::LowerCamel => is_lower_camel_case(name),
            Self::LowerSnake => is_lower_snake_case(name),
            Self::UpperSnake => is_upper_snake_case(name),
        }
    }

    /// Converts `name` to this casing.
    #[must_use]
    pub fn convert(self, name: &str) -> String {
        match self {
            Self::UpperCamel => to_upper_camel_case(name),
            Self::LowerCamel => to_lower_camel_case(name),
            Self::LowerSnake => to_lower_snake_case(name),
            Self::UpperSnake => to_upper_snake_case(name),
        }
    }

    /// Phrase used in failure messages.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::UpperCamel => "UpperCamelCase",
            Self::LowerCamel => "LowerCamelCase",
            Self::LowerSnake => "underscore_separated_names",
            Self::UpperSnake => "CAPITALS_WITH_UNDERSCORES",
        }
    }
}

/// Splits an identifier into words.
#[must_use]
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Words of `name`, lowercased first when `name` is `UPPER_SNAKE_CASE`.
fn normalized_words(name: &str) -> Vec<String> {
    let words = split_words(name);
    if name.contains('_') && is_upper_snake_case(name) {
        words.into_iter().map(|w| w.to_ascii_lowercase()).collect()
    } else {
        words
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

/// Converts to `UpperCamelCase`, keeping acronyms intact.
#[must_use]
pub fn to_upper_camel_case(name: &str) -> String {
    normalized_words(name)
        .iter()
        .map(|w| capitalize(w))
        .collect()
}

/// Converts to `lowerCamelCase`.
#[must_use]
pub fn to_lower_camel_case(name: &str) -> String {
    let words = normalized_words(name);
    let mut output = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            output.push_str(&capitalize(word));
        } else if word.chars().all(|c| !c.is_ascii_lowercase()) {
            output.push_str(&word.to_ascii_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                output.push(first.to_ascii_lowercase());
                output.push_str(chars.as_str());
            }
        }
    }
    output
}

/// Converts to `lower_snake_case`.
#[must_use]
pub fn to_lower_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts to `UPPER_SNAKE_CASE`.
#[must_use]
pub fn to_upper_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn first_char_is(name: &str, pred: fn(&char) -> bool) -> bool {
    name.chars().next().is_some_and(|c| pred(&c))
}

/// Returns true for `UpperCamelCase` identifiers.
#[must_use]
pub fn is_upper_camel_case(name: &str) -> bool {
    first_char_is(name, char::is_ascii_uppercase) && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns true for `lowerCamelCase` identifiers.
#[must_use]
pub fn is_lower_camel_case(name: &str) -> bool {
    first_char_is(name, char::is_ascii_lowercase) && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns true for `lower_snake_case` identifiers.
#[must_use]
pub fn is_lower_snake_case(name: &str) -> bool {
    first_char_is(name, char::is_ascii_lowercase)
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Returns true for `UPPER_SNAKE_CASE` identifiers.
#[must_use]
pub fn is_upper_snake_case(name: &str) -> bool {
    first_char_is(name, char::is_ascii_uppercase)
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
