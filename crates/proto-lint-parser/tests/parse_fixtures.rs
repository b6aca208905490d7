//! Parses fixture files and checks the shape of the resulting tree.

use std::collections::HashMap;

use proto_lint_core::visitor::walk;
use proto_lint_core::{Node, NodeKind, Position, Visitee};
use proto_lint_parser::parse_proto;

const LIBRARY: &str = include_str!("testdata/library.proto");

fn kind_counts(source: &str) -> HashMap<NodeKind, usize> {
    let proto = parse_proto("library.proto", source).unwrap();
    let mut counts = HashMap::new();
    walk(&proto, &mut |node| {
        *counts.entry(node.kind()).or_insert(0) += 1;
    });
    counts
}

#[test]
fn library_fixture_parses_every_declaration() {
    let counts = kind_counts(LIBRARY);
    assert_eq!(counts[&NodeKind::Proto], 1);
    assert_eq!(counts[&NodeKind::Syntax], 1);
    assert_eq!(counts[&NodeKind::Package], 1);
    assert_eq!(counts[&NodeKind::Import], 2);
    assert_eq!(counts[&NodeKind::Message], 3);
    assert_eq!(counts[&NodeKind::Field], 11);
    assert_eq!(counts[&NodeKind::MapField], 1);
    assert_eq!(counts[&NodeKind::Oneof], 1);
    assert_eq!(counts[&NodeKind::Enum], 1);
    assert_eq!(counts[&NodeKind::EnumValue], 3);
    assert_eq!(counts[&NodeKind::Reserved], 2);
    assert_eq!(counts[&NodeKind::Service], 1);
    assert_eq!(counts[&NodeKind::Rpc], 3);
    // Two file options, one service option, one rpc option.
    assert_eq!(counts[&NodeKind::Option], 4);
}

#[test]
fn walk_order_follows_the_source() {
    let proto = parse_proto("library.proto", LIBRARY).unwrap();
    let mut named = Vec::new();
    walk(&proto, &mut |node| {
        if let (NodeKind::Message | NodeKind::Enum | NodeKind::Service, Some(name)) =
            (node.kind(), node.name())
        {
            named.push(name.to_string());
        }
    });
    assert_eq!(
        named,
        vec![
            "Book",
            "Format",
            "ListBooksRequest",
            "ListBooksResponse",
            "LibraryService"
        ]
    );
}

#[test]
fn positions_point_at_declaration_keywords() {
    let proto = parse_proto("library.proto", LIBRARY).unwrap();
    let mut rpcs = Vec::new();
    walk(&proto, &mut |node| {
        if let Node::Rpc(rpc) = node {
            rpcs.push(rpc.meta.pos.clone());
        }
    });

    for pos in &rpcs {
        assert!(LIBRARY[pos.offset..].starts_with("rpc "), "{pos}");
        let line = LIBRARY.lines().nth(pos.line - 1).unwrap();
        assert_eq!(&line[pos.column - 1..pos.column + 2], "rpc");
    }
    assert_eq!(rpcs[0].line, 52);
}

#[test]
fn aggregate_option_keeps_its_text() {
    let proto = parse_proto("library.proto", LIBRARY).unwrap();
    let constants: Vec<&str> = proto
        .body
        .iter()
        .filter_map(|v| match v {
            Visitee::Option(o) => Some(o.constant.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(constants[0], "\"example.com/library/v1;libraryv1\"");
    assert!(constants[1].starts_with('{'));
    assert!(constants[1].contains("tags: [\"a\", \"b\"]"));
    assert!(constants[1].ends_with('}'));
}

#[test]
fn file_meta_spans_the_whole_source() {
    let proto = parse_proto("library.proto", LIBRARY).unwrap();
    assert_eq!(proto.meta.pos, Position::new("library.proto", 0, 1, 1));
    assert_eq!(proto.meta.last_pos.offset, LIBRARY.len());
}
