//! Tree model for parsed schema files.
//!
//! A [`Proto`] owns an ordered sequence of [`Visitee`] declarations, each of
//! which may own further declarations. Rules never see the owned types
//! directly; they receive a borrowed [`Node`] from the dispatcher.

use crate::position::Meta;

/// Root of a parsed schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proto {
    /// File name the tree was parsed from.
    pub filename: String,
    /// Top-level declarations in source order.
    pub body: Vec<Visitee>,
    /// Position of the file start.
    pub meta: Meta,
}

impl Proto {
    /// Creates a tree from top-level declarations.
    #[must_use]
    pub fn new(body: Vec<Visitee>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

/// An owned declaration inside a [`Proto`] or another declaration body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Visitee {
    Syntax(Syntax),
    Package(Package),
    Import(Import),
    Option(OptionStatement),
    Message(Message),
    Field(Field),
    MapField(MapField),
    Oneof(Oneof),
    Enum(Enum),
    EnumValue(EnumValue),
    Service(Service),
    Rpc(Rpc),
    Reserved(Reserved),
    Extensions(Extensions),
    Extend(Extend),
}

/// `syntax = "proto3";` or `edition = "2023";`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Syntax {
    /// Quoted value without quotes.
    pub version: String,
    /// True for an `edition` declaration.
    pub is_edition: bool,
    /// Position metadata.
    pub meta: Meta,
}

/// `package foo.bar;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Full dotted package name.
    pub name: String,
    /// Position metadata.
    pub meta: Meta,
}

/// Import modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportModifier {
    /// `import weak`
    Weak,
    /// `import public`
    Public,
}

/// `import "other.proto";`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Import {
    /// Imported path without quotes.
    pub location: String,
    /// Optional `weak` / `public` modifier.
    pub modifier: Option<ImportModifier>,
    /// Position metadata.
    pub meta: Meta,
}

/// `option java_package = "com.example";`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStatement {
    /// Option name, including parentheses for custom options.
    pub name: String,
    /// Constant as written in source.
    pub constant: String,
    /// Position metadata.
    pub meta: Meta,
}

/// `message Foo { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Message name.
    pub name: String,
    /// Nested declarations in source order.
    pub body: Vec<Visitee>,
    /// Position metadata.
    pub meta: Meta,
}

/// Field cardinality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FieldLabel {
    Optional,
    Required,
    Repeated,
}

/// A bracketed field option (`[deprecated = true]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOption {
    /// Option name.
    pub name: String,
    /// Constant as written in source.
    pub constant: String,
}

/// `repeated string name = 1;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Optional cardinality label.
    pub label: Option<FieldLabel>,
    /// Field type as written.
    pub type_name: String,
    /// Field name.
    pub name: String,
    /// Field number as written.
    pub number: String,
    /// Bracketed options.
    pub options: Vec<FieldOption>,
    /// Position metadata.
    pub meta: Meta,
}

/// `map<string, Project> projects = 3;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapField {
    /// Key type.
    pub key_type: String,
    /// Value type.
    pub type_name: String,
    /// Field name.
    pub name: String,
    /// Field number as written.
    pub number: String,
    /// Bracketed options.
    pub options: Vec<FieldOption>,
    /// Position metadata.
    pub meta: Meta,
}

/// `oneof choice { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Oneof {
    /// Oneof name.
    pub name: String,
    /// Fields and options in source order.
    pub body: Vec<Visitee>,
    /// Position metadata.
    pub meta: Meta,
}

/// `enum Corpus { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    /// Enum name.
    pub name: String,
    /// Values, options and reservations in source order.
    pub body: Vec<Visitee>,
    /// Position metadata.
    pub meta: Meta,
}

impl Enum {
    /// Returns the values of this enum in source order.
    pub fn values(&self) -> impl Iterator<Item = &EnumValue> {
        self.body.iter().filter_map(|v| match v {
            Visitee::EnumValue(value) => Some(value),
            _ => None,
        })
    }
}

/// `CORPUS_WEB = 1;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Number as written, including any sign.
    pub number: String,
    /// Bracketed options.
    pub options: Vec<FieldOption>,
    /// Position metadata.
    pub meta: Meta,
}

/// `service SearchService { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// RPCs and options in source order.
    pub body: Vec<Visitee>,
    /// Position metadata.
    pub meta: Meta,
}

/// Request or response type of an RPC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcMessage {
    /// Message type as written.
    pub message_type: String,
    /// Whether the argument is declared with `stream`.
    pub streaming: bool,
}

/// `rpc Search (SearchRequest) returns (SearchResponse);`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rpc {
    /// RPC name.
    pub name: String,
    /// Request type.
    pub request: RpcMessage,
    /// Response type.
    pub response: RpcMessage,
    /// Options declared in the RPC body.
    pub options: Vec<OptionStatement>,
    /// Position metadata.
    pub meta: Meta,
}

/// `reserved 2, 15, 9 to 11;` or `reserved "foo", "bar";`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reserved {
    /// Reserved number ranges as written.
    pub ranges: Vec<String>,
    /// Reserved field names without quotes.
    pub names: Vec<String>,
    /// Position metadata.
    pub meta: Meta,
}

/// `extensions 100 to 199;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    /// Extension ranges as written.
    pub ranges: Vec<String>,
    /// Position metadata.
    pub meta: Meta,
}

/// `extend Foo { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extend {
    /// Extended message type.
    pub type_name: String,
    /// Extension fields.
    pub body: Vec<Visitee>,
    /// Position metadata.
    pub meta: Meta,
}

/// Kind of a tree node, used by rules to declare interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NodeKind {
    Proto,
    Syntax,
    Package,
    Import,
    Option,
    Message,
    Field,
    MapField,
    Oneof,
    Enum,
    EnumValue,
    Service,
    Rpc,
    Reserved,
    Extensions,
    Extend,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Proto => "proto",
            Self::Syntax => "syntax",
            Self::Package => "package",
            Self::Import => "import",
            Self::Option => "option",
            Self::Message => "message",
            Self::Field => "field",
            Self::MapField => "map field",
            Self::Oneof => "oneof",
            Self::Enum => "enum",
            Self::EnumValue => "enum value",
            Self::Service => "service",
            Self::Rpc => "rpc",
            Self::Reserved => "reserved",
            Self::Extensions => "extensions",
            Self::Extend => "extend",
        };
        f.write_str(name)
    }
}

/// Borrowed view of any node in a [`Proto`] tree.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub enum Node<'a> {
    Proto(&'a Proto),
    Syntax(&'a Syntax),
    Package(&'a Package),
    Import(&'a Import),
    Option(&'a OptionStatement),
    Message(&'a Message),
    Field(&'a Field),
    MapField(&'a MapField),
    Oneof(&'a Oneof),
    Enum(&'a Enum),
    EnumValue(&'a EnumValue),
    Service(&'a Service),
    Rpc(&'a Rpc),
    Reserved(&'a Reserved),
    Extensions(&'a Extensions),
    Extend(&'a Extend),
}

impl<'a> Node<'a> {
    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Proto(_) => NodeKind::Proto,
            Self::Syntax(_) => NodeKind::Syntax,
            Self::Package(_) => NodeKind::Package,
            Self::Import(_) => NodeKind::Import,
            Self::Option(_) => NodeKind::Option,
            Self::Message(_) => NodeKind::Message,
            Self::Field(_) => NodeKind::Field,
            Self::MapField(_) => NodeKind::MapField,
            Self::Oneof(_) => NodeKind::Oneof,
            Self::Enum(_) => NodeKind::Enum,
            Self::EnumValue(_) => NodeKind::EnumValue,
            Self::Service(_) => NodeKind::Service,
            Self::Rpc(_) => NodeKind::Rpc,
            Self::Reserved(_) => NodeKind::Reserved,
            Self::Extensions(_) => NodeKind::Extensions,
            Self::Extend(_) => NodeKind::Extend,
        }
    }

    /// Returns the position metadata of this node.
    #[must_use]
    pub fn meta(self) -> &'a Meta {
        match self {
            Self::Proto(n) => &n.meta,
            Self::Syntax(n) => &n.meta,
            Self::Package(n) => &n.meta,
            Self::Import(n) => &n.meta,
            Self::Option(n) => &n.meta,
            Self::Message(n) => &n.meta,
            Self::Field(n) => &n.meta,
            Self::MapField(n) => &n.meta,
            Self::Oneof(n) => &n.meta,
            Self::Enum(n) => &n.meta,
            Self::EnumValue(n) => &n.meta,
            Self::Service(n) => &n.meta,
            Self::Rpc(n) => &n.meta,
            Self::Reserved(n) => &n.meta,
            Self::Extensions(n) => &n.meta,
            Self::Extend(n) => &n.meta,
        }
    }

    /// Returns the declared identifier, for kinds that declare one.
    #[must_use]
    pub fn name(self) -> Option<&'a str> {
        match self {
            Self::Package(n) => Some(&n.name),
            Self::Option(n) => Some(&n.name),
            Self::Message(n) => Some(&n.name),
            Self::Field(n) => Some(&n.name),
            Self::MapField(n) => Some(&n.name),
            Self::Oneof(n) => Some(&n.name),
            Self::Enum(n) => Some(&n.name),
            Self::EnumValue(n) => Some(&n.name),
            Self::Service(n) => Some(&n.name),
            Self::Rpc(n) => Some(&n.name),
            Self::Proto(_)
            | Self::Syntax(_)
            | Self::Import(_)
            | Self::Reserved(_)
            | Self::Extensions(_)
            | Self::Extend(_) => None,
        }
    }

    /// Returns the owned children of this node in source order.
    #[must_use]
    pub fn children(self) -> &'a [Visitee] {
        match self {
            Self::Proto(n) => &n.body,
            Self::Message(n) => &n.body,
            Self::Oneof(n) => &n.body,
            Self::Enum(n) => &n.body,
            Self::Service(n) => &n.body,
            Self::Extend(n) => &n.body,
            _ => &[],
        }
    }
}

impl<'a> From<&'a Visitee> for Node<'a> {
    fn from(visitee: &'a Visitee) -> Self {
        match visitee {
            Visitee::Syntax(n) => Self::Syntax(n),
            Visitee::Package(n) => Self::Package(n),
            Visitee::Import(n) => Self::Import(n),
            Visitee::Option(n) => Self::Option(n),
            Visitee::Message(n) => Self::Message(n),
            Visitee::Field(n) => Self::Field(n),
            Visitee::MapField(n) => Self::MapField(n),
            Visitee::Oneof(n) => Self::Oneof(n),
            Visitee::Enum(n) => Self::Enum(n),
            Visitee::EnumValue(n) => Self::EnumValue(n),
            Visitee::Service(n) => Self::Service(n),
            Visitee::Rpc(n) => Self::Rpc(n),
            Visitee::Reserved(n) => Self::Reserved(n),
            Visitee::Extensions(n) => Self::Extensions(n),
            Visitee::Extend(n) => Self::Extend(n),
        }
    }
}

impl<'a> From<&'a Proto> for Node<'a> {
    fn from(proto: &'a Proto) -> Self {
        Self::Proto(proto)
    }
}
