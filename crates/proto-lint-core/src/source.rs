//! Locating declaration tokens in source text for fixes.

use std::ops::Range;

use crate::lexer::{Lexer, Token, TokenKind};
use crate::position::Position;
use crate::rule::RuleError;

/// Where the declared identifier sits inside a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameToken {
    /// Directly after a keyword: `rpc Name`, `message Name`.
    AfterKeyword(&'static str),
    /// The first token of the declaration: `NAME = 1;`.
    Leading,
    /// The last identifier before `=`: `repeated Type name = 1;`.
    BeforeAssign,
}

/// Source text of the file being fixed.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    filename: &'a str,
    text: &'a str,
}

impl<'a> SourceText<'a> {
    /// Wraps the raw text of `filename`.
    #[must_use]
    pub fn new(filename: &'a str, text: &'a str) -> Self {
        Self { filename, text }
    }

    /// Returns the file name.
    #[must_use]
    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Returns the raw text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    fn lexer_at(&self, pos: &Position) -> Result<Lexer<'a>, RuleError> {
        if pos.offset > self.text.len() || !self.text.is_char_boundary(pos.offset) {
            return Err(RuleError::PositionOutOfRange { offset: pos.offset });
        }
        Ok(Lexer::resume(self.text, pos.offset, pos.line, pos.column))
    }

    /// Finds the byte range of `name` in the declaration starting at `pos`.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration does not contain `name` where
    /// `token` says it should be.
    pub fn locate_name(
        &self,
        pos: &Position,
        name: &str,
        token: NameToken,
    ) -> Result<Range<usize>, RuleError> {
        let mut lexer = self.lexer_at(pos)?;
        let not_found = || RuleError::NameNotFound {
            name: name.to_string(),
            offset: pos.offset,
        };

        let found = match token {
            NameToken::AfterKeyword(keyword) => {
                expect_keyword(&mut lexer, keyword)?;
                next(&mut lexer)?
            }
            NameToken::Leading => next(&mut lexer)?,
            NameToken::BeforeAssign => {
                let mut last_ident = None;
                loop {
                    let token = next(&mut lexer)?;
                    if token.is_symbol('=') {
                        break;
                    }
                    if token.is_symbol(';') || token.is_symbol('{') || token.is_symbol('}') {
                        return Err(not_found());
                    }
                    if token.kind == TokenKind::Ident {
                        last_ident = Some(token);
                    }
                }
                last_ident.ok_or_else(not_found)?
            }
        };

        if found.is_ident(name) {
            Ok(found.offset..found.end())
        } else {
            Err(not_found())
        }
    }

    /// Finds a dotted name following `keyword` (`package foo.bar.baz;`).
    ///
    /// The parts may be separated by whitespace or comments
    /// (`package foo . /* v */ bar;`); only the tokens have to spell `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokens after `keyword` do not spell `name`.
    pub fn locate_dotted_name(
        &self,
        pos: &Position,
        keyword: &str,
        name: &str,
    ) -> Result<DottedName, RuleError> {
        let mut lexer = self.lexer_at(pos)?;
        expect_keyword(&mut lexer, keyword)?;

        let mut spelled = String::new();
        let mut span: Option<Range<usize>> = None;
        let mut idents = Vec::new();
        loop {
            let token = next(&mut lexer)?;
            if token.is_symbol(';') {
                break;
            }
            if token.kind == TokenKind::Ident {
                idents.push(token.offset..token.end());
            }
            spelled.push_str(token.text);
            let start = span.as_ref().map_or(token.offset, |s| s.start);
            span = Some(start..token.end());
        }

        match span {
            Some(span) if spelled == name => Ok(DottedName { span, idents }),
            _ => Err(RuleError::NameNotFound {
                name: name.to_string(),
                offset: pos.offset,
            }),
        }
    }

    /// Rewrites the text of `name`, passing each identifier through
    /// `rewrite` and copying dots, whitespace, and comments unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` was not located in this text.
    pub fn rewrite_dotted_name<F>(&self, name: &DottedName, rewrite: F) -> Result<String, RuleError>
    where
        F: Fn(&str) -> String,
    {
        let slice = |range: Range<usize>| {
            self.text
                .get(range.clone())
                .ok_or(RuleError::PositionOutOfRange {
                    offset: range.start,
                })
        };

        let mut output = String::with_capacity(name.span.len());
        let mut cursor = name.span.start;
        for ident in &name.idents {
            output.push_str(slice(cursor..ident.start)?);
            output.push_str(&rewrite(slice(ident.clone())?));
            cursor = ident.end;
        }
        output.push_str(slice(cursor..name.span.end)?);
        Ok(output)
    }
}

/// A dotted name located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedName {
    /// From the first to the last token of the name.
    pub span: Range<usize>,
    /// Identifier parts in source order.
    pub idents: Vec<Range<usize>>,
}

fn next<'s>(lexer: &mut Lexer<'s>) -> Result<Token<'s>, RuleError> {
    lexer.next_token()?.ok_or(RuleError::UnexpectedEof)
}

fn expect_keyword(lexer: &mut Lexer<'_>, keyword: &str) -> Result<(), RuleError> {
    let token = next(lexer)?;
    if token.is_ident(keyword) {
        Ok(())
    } else {
        Err(RuleError::UnexpectedToken {
            expected: keyword.to_string(),
            found: token.text.to_string(),
            offset: token.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "package foo.Bar;\n\nservice S {\n  rpc get_thing (A) returns (B);\n}\nmessage M {\n  repeated .pkg.Type song_Name = 1 [deprecated = true];\n  map<string, int32> Counts = 2;\n}\nenum E {\n  value_one = 0;\n}\n";

    fn pos_of(needle: &str) -> Position {
        let offset = SOURCE.find(needle).unwrap();
        let before = &SOURCE[..offset];
        let line = before.matches('\n').count() + 1;
        let column = offset - before.rfind('\n').map_or(0, |i| i + 1) + 1;
        Position::new("a.proto", offset, line, column)
    }

    fn slice(range: Range<usize>) -> &'static str {
        &SOURCE[range]
    }

    #[test]
    fn locates_name_after_keyword() {
        let src = SourceText::new("a.proto", SOURCE);
        let range = src
            .locate_name(
                &pos_of("rpc get_thing"),
                "get_thing",
                NameToken::AfterKeyword("rpc"),
            )
            .unwrap();
        assert_eq!(slice(range), "get_thing");
    }

    #[test]
    fn locates_field_name_before_assign() {
        let src = SourceText::new("a.proto", SOURCE);
        let range = src
            .locate_name(&pos_of("repeated"), "song_Name", NameToken::BeforeAssign)
            .unwrap();
        assert_eq!(slice(range), "song_Name");

        let range = src
            .locate_name(&pos_of("map<"), "Counts", NameToken::BeforeAssign)
            .unwrap();
        assert_eq!(slice(range), "Counts");
    }

    #[test]
    fn locates_leading_enum_value() {
        let src = SourceText::new("a.proto", SOURCE);
        let range = src
            .locate_name(&pos_of("value_one"), "value_one", NameToken::Leading)
            .unwrap();
        assert_eq!(slice(range), "value_one");
    }

    #[test]
    fn locates_dotted_package() {
        let src = SourceText::new("a.proto", SOURCE);
        let name = src
            .locate_dotted_name(&pos_of("package"), "package", "foo.Bar")
            .unwrap();
        assert_eq!(slice(name.span.clone()), "foo.Bar");
        assert_eq!(name.idents.len(), 2);
        assert_eq!(
            src.rewrite_dotted_name(&name, str::to_ascii_lowercase).unwrap(),
            "foo.bar"
        );
    }

    #[test]
    fn dotted_name_keeps_whitespace_and_comments() {
        let text = "syntax = \"proto3\";\npackage Foo . /* Keep */ Bar;\n";
        let src = SourceText::new("a.proto", text);
        let pos = Position::new("a.proto", 19, 2, 1);

        let name = src.locate_dotted_name(&pos, "package", "Foo.Bar").unwrap();
        assert_eq!(&text[name.span.clone()], "Foo . /* Keep */ Bar");
        assert_eq!(
            src.rewrite_dotted_name(&name, str::to_ascii_lowercase).unwrap(),
            "foo . /* Keep */ bar"
        );

        let err = src.locate_dotted_name(&pos, "package", "Foo.Baz").unwrap_err();
        assert!(matches!(err, RuleError::NameNotFound { .. }));
    }

    #[test]
    fn rejects_mismatched_keyword() {
        let src = SourceText::new("a.proto", SOURCE);
        let err = src
            .locate_name(
                &pos_of("service"),
                "S",
                NameToken::AfterKeyword("message"),
            )
            .unwrap_err();
        assert!(matches!(err, RuleError::UnexpectedToken { .. }));
    }

    #[test]
    fn rejects_mismatched_name() {
        let src = SourceText::new("a.proto", SOURCE);
        let err = src
            .locate_name(&pos_of("rpc"), "Other", NameToken::AfterKeyword("rpc"))
            .unwrap_err();
        assert!(matches!(err, RuleError::NameNotFound { .. }));
    }

    #[test]
    fn rejects_out_of_range_position() {
        let src = SourceText::new("a.proto", SOURCE);
        let err = src
            .locate_name(
                &Position::new("a.proto", 10_000, 1, 1),
                "x",
                NameToken::Leading,
            )
            .unwrap_err();
        assert_eq!(err, RuleError::PositionOutOfRange { offset: 10_000 });
    }
}
