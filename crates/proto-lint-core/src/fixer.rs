//! Applying rule edits to source text.

use thiserror::Error;

use crate::types::Edit;

/// Errors raised while applying a set of edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    /// Two edits touch the same bytes.
    #[error("{first} conflicts with {second}")]
    Conflict {
        /// Edit that starts first.
        first: Edit,
        /// Edit overlapping it.
        second: Edit,
    },

    /// An edit cannot be applied to this text.
    #[error("invalid edit {edit}: {reason}")]
    InvalidEdit {
        /// The offending edit.
        edit: Edit,
        /// Why it was rejected.
        reason: String,
    },
}

/// Progress of a fix run, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStage {
    /// Original text parsed.
    Parsed,
    /// Rules evaluated against the original tree.
    Evaluated,
    /// Fixable failures turned into edits.
    EditsComputed,
    /// Edits applied to the text.
    Applied,
    /// Rewritten text parsed and checked again.
    Reverified,
}

impl std::fmt::Display for FixStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Parsed => "parsed",
            Self::Evaluated => "evaluated",
            Self::EditsComputed => "edits computed",
            Self::Applied => "applied",
            Self::Reverified => "reverified",
        };
        f.write_str(name)
    }
}

fn validate(text: &str, edit: &Edit) -> Result<(), FixError> {
    let reason = if edit.start > edit.end {
        Some("start is after end")
    } else if edit.end > text.len() {
        Some("span extends past end of text")
    } else if !text.is_char_boundary(edit.start) || !text.is_char_boundary(edit.end) {
        Some("span splits a character")
    } else if edit.replacement.is_empty() && edit.start != edit.end {
        Some("empty replacement")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FixError::InvalidEdit {
            edit: edit.clone(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Applies `edits` to `text` in one pass.
///
/// Edits may arrive in any order. Identical duplicates are applied once.
/// Bytes outside every edit span are copied unchanged.
///
/// # Errors
///
/// Returns [`FixError::InvalidEdit`] for an edit that does not fit `text`
/// and [`FixError::Conflict`] if two distinct edits overlap. Nothing is
/// applied in either case.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String, FixError> {
    for edit in edits {
        validate(text, edit)?;
    }

    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
            .then_with(|| a.replacement.cmp(&b.replacement))
    });
    sorted.dedup();

    for pair in sorted.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(FixError::Conflict {
                first: pair[0].clone(),
                second: pair[1].clone(),
            });
        }
    }

    let capacity = text.len() + sorted.iter().map(|e| e.replacement.len()).sum::<usize>();
    let mut output = String::with_capacity(capacity);
    let mut cursor = 0;
    for edit in sorted {
        output.push_str(&text[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }
    output.push_str(&text[cursor..]);
    Ok(output)
}
