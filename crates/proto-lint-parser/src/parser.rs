//! Recursive-descent parser over the core token stream.

use proto_lint_core::lexer::{tokenize, Token, TokenKind};
use proto_lint_core::tree::{
    Enum, EnumValue, Extend, Extensions, Field, FieldLabel, FieldOption, Import, ImportModifier,
    MapField, Message, Oneof, OptionStatement, Package, Reserved, Rpc, RpcMessage, Service,
    Syntax,
};
use proto_lint_core::{Meta, ParseError, Position, Proto, Visitee};

type Result<T> = std::result::Result<T, ParseError>;

pub(crate) struct Parser<'s> {
    filename: &'s str,
    source: &'s str,
    tokens: Vec<Token<'s>>,
    index: usize,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(filename: &'s str, source: &'s str) -> Result<Self> {
        let tokens = tokenize(source).map_err(|e| {
            ParseError::new(
                Position::new(filename, e.offset, e.line, e.column),
                e.message,
            )
        })?;
        Ok(Self {
            filename,
            source,
            tokens,
            index: 0,
        })
    }

    pub(crate) fn parse(mut self) -> Result<Proto> {
        let mut body = Vec::new();
        while let Some(token) = self.peek() {
            let decl = match token.text {
                ";" if token.kind == TokenKind::Symbol => {
                    self.index += 1;
                    continue;
                }
                "syntax" | "edition" => Visitee::Syntax(self.syntax()?),
                "package" => Visitee::Package(self.package()?),
                "import" => Visitee::Import(self.import()?),
                "option" => Visitee::Option(self.option()?),
                "message" => Visitee::Message(self.message()?),
                "enum" => Visitee::Enum(self.enumeration()?),
                "service" => Visitee::Service(self.service()?),
                "extend" => Visitee::Extend(self.extend()?),
                _ => return Err(self.unexpected(token, "top-level declaration")),
            };
            body.push(decl);
        }

        Ok(Proto {
            filename: self.filename.to_string(),
            body,
            meta: Meta::new(Position::new(self.filename, 0, 1, 1), self.eof_position()),
        })
    }

    // Token helpers

    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.index).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'s>> {
        self.tokens.get(self.index + n).copied()
    }

    fn peek_is_symbol(&self, symbol: char) -> bool {
        self.peek().is_some_and(|t| t.is_symbol(symbol))
    }

    fn peek_is_ident(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(text))
    }

    /// A keyword starts a declaration unless it is really a field type,
    /// as in `message message = 1;`.
    fn at_declaration(&self, keyword: &str) -> bool {
        self.peek_is_ident(keyword) && !self.peek_nth(2).is_some_and(|t| t.is_symbol('='))
    }

    fn bump(&mut self) -> Result<Token<'s>> {
        let token = self
            .peek()
            .ok_or_else(|| ParseError::new(self.eof_position(), "unexpected end of input"))?;
        self.index += 1;
        Ok(token)
    }

    fn eat_symbol(&mut self, symbol: char) -> Option<Token<'s>> {
        let token = self.peek().filter(|t| t.is_symbol(symbol))?;
        self.index += 1;
        Some(token)
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<Token<'s>> {
        let token = self.bump()?;
        if token.is_symbol(symbol) {
            Ok(token)
        } else {
            Err(self.unexpected(token, &format!("`{symbol}`")))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token<'s>> {
        let token = self.bump()?;
        if token.is_ident(keyword) {
            Ok(token)
        } else {
            Err(self.unexpected(token, &format!("`{keyword}`")))
        }
    }

    fn expect_ident(&mut self) -> Result<Token<'s>> {
        let token = self.bump()?;
        if token.kind == TokenKind::Ident {
            Ok(token)
        } else {
            Err(self.unexpected(token, "identifier"))
        }
    }

    fn expect_kind(&mut self, kind: TokenKind, what: &str) -> Result<Token<'s>> {
        let token = self.bump()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(token, what))
        }
    }

    fn position(&self, token: Token<'_>) -> Position {
        token.position(self.filename)
    }

    fn meta(&self, first: Token<'_>, last: Token<'_>) -> Meta {
        Meta::new(self.position(first), self.position(last))
    }

    fn eof_position(&self) -> Position {
        let line = self.source.matches('\n').count() + 1;
        let line_start = self.source.rfind('\n').map_or(0, |i| i + 1);
        let column = self.source[line_start..].chars().count() + 1;
        Position::new(self.filename, self.source.len(), line, column)
    }

    fn unexpected(&self, token: Token<'_>, expected: &str) -> ParseError {
        ParseError::new(
            self.position(token),
            format!("expected {expected}, found `{}`", token.text),
        )
    }

    /// `foo.bar.Baz`
    fn full_ident(&mut self) -> Result<String> {
        let mut name = self.expect_ident()?.text.to_string();
        while self.peek_is_symbol('.') {
            self.index += 1;
            name.push('.');
            name.push_str(self.expect_ident()?.text);
        }
        Ok(name)
    }

    /// A message or enum type reference, optionally fully qualified.
    fn type_name(&mut self) -> Result<String> {
        if self.eat_symbol('.').is_some() {
            Ok(format!(".{}", self.full_ident()?))
        } else {
            self.full_ident()
        }
    }

    /// `java_package`, `(my.custom).field`
    fn option_name(&mut self) -> Result<String> {
        let mut name = String::new();
        if self.eat_symbol('(').is_some() {
            name.push('(');
            name.push_str(&self.type_name()?);
            self.expect_symbol(')')?;
            name.push(')');
        } else {
            name.push_str(self.expect_ident()?.text);
        }
        while self.eat_symbol('.').is_some() {
            name.push('.');
            if self.eat_symbol('(').is_some() {
                name.push('(');
                name.push_str(&self.type_name()?);
                self.expect_symbol(')')?;
                name.push(')');
            } else {
                name.push_str(self.expect_ident()?.text);
            }
        }
        Ok(name)
    }

    /// An option value, returned exactly as written.
    fn constant(&mut self) -> Result<String> {
        let first = self.bump()?;

        let last = if first.is_symbol('{') {
            let mut depth = 1usize;
            loop {
                let token = self.bump()?;
                if token.is_symbol('{') {
                    depth += 1;
                } else if token.is_symbol('}') {
                    depth -= 1;
                    if depth == 0 {
                        break token;
                    }
                }
            }
        } else {
            let value = if first.is_symbol('-') || first.is_symbol('+') {
                self.bump()?
            } else {
                first
            };
            match value.kind {
                TokenKind::Number => value,
                TokenKind::Str => {
                    let mut last = value;
                    while self.peek().is_some_and(|t| t.kind == TokenKind::Str) {
                        last = self.bump()?;
                    }
                    last
                }
                TokenKind::Ident => {
                    let mut last = value;
                    while self.peek_is_symbol('.')
                        && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Ident)
                    {
                        self.index += 1;
                        last = self.bump()?;
                    }
                    last
                }
                TokenKind::Symbol => return Err(self.unexpected(value, "constant")),
            }
        };

        Ok(self.source[first.offset..last.end()].to_string())
    }

    /// `[deprecated = true, (custom) = "x"]`
    fn field_options(&mut self) -> Result<Vec<FieldOption>> {
        let mut options = Vec::new();
        if self.eat_symbol('[').is_none() {
            return Ok(options);
        }
        loop {
            let name = self.option_name()?;
            self.expect_symbol('=')?;
            let constant = self.constant()?;
            options.push(FieldOption { name, constant });
            if self.eat_symbol(']').is_some() {
                return Ok(options);
            }
            self.expect_symbol(',')?;
        }
    }

    /// Comma-separated `N`, `N to M`, `N to max` items.
    fn ranges(&mut self) -> Result<Vec<String>> {
        let mut ranges = Vec::new();
        loop {
            let start = self.range_bound()?;
            if self.peek_is_ident("to") {
                self.index += 1;
                let end = if self.peek_is_ident("max") {
                    self.bump()?.text.to_string()
                } else {
                    self.range_bound()?
                };
                ranges.push(format!("{start} to {end}"));
            } else {
                ranges.push(start);
            }
            if self.eat_symbol(',').is_none() {
                return Ok(ranges);
            }
        }
    }

    fn range_bound(&mut self) -> Result<String> {
        let first = self.bump()?;
        let number = if first.is_symbol('-') {
            self.expect_kind(TokenKind::Number, "number")?
        } else if first.kind == TokenKind::Number {
            first
        } else {
            return Err(self.unexpected(first, "number"));
        };
        Ok(self.source[first.offset..number.end()].to_string())
    }

    // Declarations

    fn syntax(&mut self) -> Result<Syntax> {
        let keyword = self.bump()?;
        self.expect_symbol('=')?;
        let version = self.expect_kind(TokenKind::Str, "string literal")?;
        let end = self.expect_symbol(';')?;
        Ok(Syntax {
            version: version.unquoted().to_string(),
            is_edition: keyword.is_ident("edition"),
            meta: self.meta(keyword, end),
        })
    }

    fn package(&mut self) -> Result<Package> {
        let keyword = self.expect_keyword("package")?;
        let name = self.full_ident()?;
        let end = self.expect_symbol(';')?;
        Ok(Package {
            name,
            meta: self.meta(keyword, end),
        })
    }

    fn import(&mut self) -> Result<Import> {
        let keyword = self.expect_keyword("import")?;
        let modifier = match self.peek() {
            Some(t) if t.is_ident("weak") => Some(ImportModifier::Weak),
            Some(t) if t.is_ident("public") => Some(ImportModifier::Public),
            _ => None,
        };
        if modifier.is_some() {
            self.index += 1;
        }
        let location = self.expect_kind(TokenKind::Str, "import path")?;
        let end = self.expect_symbol(';')?;
        Ok(Import {
            location: location.unquoted().to_string(),
            modifier,
            meta: self.meta(keyword, end),
        })
    }

    fn option(&mut self) -> Result<OptionStatement> {
        let keyword = self.expect_keyword("option")?;
        let name = self.option_name()?;
        self.expect_symbol('=')?;
        let constant = self.constant()?;
        let end = self.expect_symbol(';')?;
        Ok(OptionStatement {
            name,
            constant,
            meta: self.meta(keyword, end),
        })
    }

    fn message(&mut self) -> Result<Message> {
        let keyword = self.expect_keyword("message")?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('{')?;
        let mut body = Vec::new();
        let end = loop {
            if let Some(end) = self.eat_symbol('}') {
                break end;
            }
            if self.eat_symbol(';').is_some() {
                continue;
            }
            body.push(self.message_element()?);
        };
        Ok(Message {
            name,
            body,
            meta: self.meta(keyword, end),
        })
    }

    fn message_element(&mut self) -> Result<Visitee> {
        if self.peek_is_ident("option") {
            return Ok(Visitee::Option(self.option()?));
        }
        if self.at_declaration("message") {
            return Ok(Visitee::Message(self.message()?));
        }
        if self.at_declaration("enum") {
            return Ok(Visitee::Enum(self.enumeration()?));
        }
        if self.at_declaration("oneof") {
            return Ok(Visitee::Oneof(self.oneof()?));
        }
        if self.at_declaration("extend") {
            return Ok(Visitee::Extend(self.extend()?));
        }
        if self.at_declaration("reserved") {
            return Ok(Visitee::Reserved(self.reserved()?));
        }
        if self.at_declaration("extensions") {
            return Ok(Visitee::Extensions(self.extensions()?));
        }
        if self.peek_is_ident("map") && self.peek_nth(1).is_some_and(|t| t.is_symbol('<')) {
            return Ok(Visitee::MapField(self.map_field()?));
        }
        Ok(Visitee::Field(self.field()?))
    }

    fn field(&mut self) -> Result<Field> {
        let first = self.peek().ok_or_else(|| {
            ParseError::new(self.eof_position(), "unexpected end of input")
        })?;
        let label = match first.text {
            _ if self.peek_nth(2).is_some_and(|t| t.is_symbol('=')) => None,
            "optional" => Some(FieldLabel::Optional),
            "required" => Some(FieldLabel::Required),
            "repeated" => Some(FieldLabel::Repeated),
            _ => None,
        };
        if label.is_some() {
            self.index += 1;
        }
        let type_name = self.type_name()?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('=')?;
        let number = self.expect_kind(TokenKind::Number, "field number")?;
        let options = self.field_options()?;
        let end = self.expect_symbol(';')?;
        Ok(Field {
            label,
            type_name,
            name,
            number: number.text.to_string(),
            options,
            meta: self.meta(first, end),
        })
    }

    fn map_field(&mut self) -> Result<MapField> {
        let keyword = self.expect_keyword("map")?;
        self.expect_symbol('<')?;
        let key_type = self.expect_ident()?.text.to_string();
        self.expect_symbol(',')?;
        let type_name = self.type_name()?;
        self.expect_symbol('>')?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('=')?;
        let number = self.expect_kind(TokenKind::Number, "field number")?;
        let options = self.field_options()?;
        let end = self.expect_symbol(';')?;
        Ok(MapField {
            key_type,
            type_name,
            name,
            number: number.text.to_string(),
            options,
            meta: self.meta(keyword, end),
        })
    }

    fn oneof(&mut self) -> Result<Oneof> {
        let keyword = self.expect_keyword("oneof")?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('{')?;
        let mut body = Vec::new();
        let end = loop {
            if let Some(end) = self.eat_symbol('}') {
                break end;
            }
            if self.eat_symbol(';').is_some() {
                continue;
            }
            if self.peek_is_ident("option") {
                body.push(Visitee::Option(self.option()?));
            } else {
                body.push(Visitee::Field(self.field()?));
            }
        };
        Ok(Oneof {
            name,
            body,
            meta: self.meta(keyword, end),
        })
    }

    fn enumeration(&mut self) -> Result<Enum> {
        let keyword = self.expect_keyword("enum")?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('{')?;
        let mut body = Vec::new();
        let end = loop {
            if let Some(end) = self.eat_symbol('}') {
                break end;
            }
            if self.eat_symbol(';').is_some() {
                continue;
            }
            if self.peek_is_ident("option") {
                body.push(Visitee::Option(self.option()?));
            } else if self.at_declaration("reserved") {
                body.push(Visitee::Reserved(self.reserved()?));
            } else {
                body.push(Visitee::EnumValue(self.enum_value()?));
            }
        };
        Ok(Enum {
            name,
            body,
            meta: self.meta(keyword, end),
        })
    }

    fn enum_value(&mut self) -> Result<EnumValue> {
        let name = self.expect_ident()?;
        self.expect_symbol('=')?;
        let number = self.range_bound()?;
        let options = self.field_options()?;
        let end = self.expect_symbol(';')?;
        Ok(EnumValue {
            name: name.text.to_string(),
            number,
            options,
            meta: self.meta(name, end),
        })
    }

    fn service(&mut self) -> Result<Service> {
        let keyword = self.expect_keyword("service")?;
        let name = self.expect_ident()?.text.to_string();
        self.expect_symbol('{')?;
        let mut body = Vec::new();
        let end = loop {
            if let Some(end) = self.eat_symbol('}') {
                break end;
            }
            if self.eat_symbol(';').is_some() {
                continue;
            }
            if self.peek_is_ident("option") {
                body.push(Visitee::Option(self.option()?));
            } else {
                body.push(Visitee::Rpc(self.rpc()?));
            }
        };
        Ok(Service {
            name,
            body,
            meta: self.meta(keyword, end),
        })
    }

    fn rpc(&mut self) -> Result<Rpc> {
        let keyword = self.expect_keyword("rpc")?;
        let name = self.expect_ident()?.text.to_string();
        let request = self.rpc_message()?;
        self.expect_keyword("returns")?;
        let response = self.rpc_message()?;

        let mut options = Vec::new();
        let end = if self.eat_symbol('{').is_some() {
            loop {
                if let Some(end) = self.eat_symbol('}') {
                    break end;
                }
                if self.eat_symbol(';').is_some() {
                    continue;
                }
                options.push(self.option()?);
            }
        } else {
            self.expect_symbol(';')?
        };

        Ok(Rpc {
            name,
            request,
            response,
            options,
            meta: self.meta(keyword, end),
        })
    }

    /// `(stream Foo)`
    fn rpc_message(&mut self) -> Result<RpcMessage> {
        self.expect_symbol('(')?;
        // `(stream)` and `(stream.Foo)` name a type; `(stream .Foo)` streams it.
        let streaming = match (self.peek(), self.peek_nth(1)) {
            (Some(keyword), Some(next)) if keyword.is_ident("stream") => {
                !next.is_symbol(')') && !(next.is_symbol('.') && next.offset == keyword.end())
            }
            _ => false,
        };
        if streaming {
            self.index += 1;
        }
        let message_type = self.type_name()?;
        self.expect_symbol(')')?;
        Ok(RpcMessage {
            message_type,
            streaming,
        })
    }

    fn reserved(&mut self) -> Result<Reserved> {
        let keyword = self.expect_keyword("reserved")?;
        let mut ranges = Vec::new();
        let mut names = Vec::new();
        match self.peek() {
            Some(t) if t.kind == TokenKind::Str || t.kind == TokenKind::Ident => loop {
                let token = self.bump()?;
                match token.kind {
                    TokenKind::Str | TokenKind::Ident => names.push(token.unquoted().to_string()),
                    _ => return Err(self.unexpected(token, "reserved name")),
                }
                if self.eat_symbol(',').is_none() {
                    break;
                }
            },
            _ => ranges = self.ranges()?,
        }
        let end = self.expect_symbol(';')?;
        Ok(Reserved {
            ranges,
            names,
            meta: self.meta(keyword, end),
        })
    }

    fn extensions(&mut self) -> Result<Extensions> {
        let keyword = self.expect_keyword("extensions")?;
        let ranges = self.ranges()?;
        self.field_options()?;
        let end = self.expect_symbol(';')?;
        Ok(Extensions {
            ranges,
            meta: self.meta(keyword, end),
        })
    }

    fn extend(&mut self) -> Result<Extend> {
        let keyword = self.expect_keyword("extend")?;
        let type_name = self.type_name()?;
        self.expect_symbol('{')?;
        let mut body = Vec::new();
        let end = loop {
            if let Some(end) = self.eat_symbol('}') {
                break end;
            }
            if self.eat_symbol(';').is_some() {
                continue;
            }
            body.push(Visitee::Field(self.field()?));
        };
        Ok(Extend {
            type_name,
            body,
            meta: self.meta(keyword, end),
        })
    }
}
