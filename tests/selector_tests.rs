//! Selector paths and inherited attribute values over generated trees

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xliff::selectors::{resolve, resolve_from, selector_id, selector_path};
use xliff::{Document, ElementKind as K, NodeId};

/// Shape of one generated unit: whether it sits in a group, how many segments it
/// has, whether segments carry targets, its own `translate` flag, and which
/// auxiliary children it holds
///
/// `candidate` adds a translation candidate whose codes reuse the ids of the
/// first segment; `Some(true)` gives the match an id of its own.
#[derive(Debug, Clone, Default)]
struct UnitShape {
    grouped: bool,
    segments: usize,
    targets: bool,
    translate: Option<bool>,
    notes: bool,
    candidate: Option<bool>,
    glossary: bool,
    ignorable: bool,
}

fn unit_shape() -> impl Strategy<Value = UnitShape> {
    (
        (any::<bool>(), 1..4usize, any::<bool>(), proptest::option::of(any::<bool>())),
        (
            any::<bool>(),
            proptest::option::of(any::<bool>()),
            any::<bool>(),
            any::<bool>(),
        ),
    )
        .prop_map(
            |((grouped, segments, targets, translate), (notes, candidate, glossary, ignorable))| {
                UnitShape {
                    grouped,
                    segments,
                    targets,
                    translate,
                    notes,
                    candidate,
                    glossary,
                    ignorable,
                }
            },
        )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Build a document from the shapes; returns it with every unit it created
fn build(
    files: &[(Option<bool>, Option<bool>, Vec<UnitShape>)],
) -> (Document, Vec<(NodeId, Option<bool>, Option<bool>, Option<bool>)>) {
    let mut doc = Document::new();
    let root = doc.root();
    doc.set_attribute(root, "version", "2.0").unwrap();
    doc.set_attribute(root, "srcLang", "en").unwrap();
    doc.set_attribute(root, "trgLang", "fr").unwrap();
    let mut counter = 0;
    let mut next = |prefix: &str| {
        counter += 1;
        format!("{}{}", prefix, counter)
    };
    let mut units = Vec::new();

    for (file_translate, group_translate, shapes) in files {
        let file = doc.append_with(root, K::File, &[("id", next("f").as_str())]).unwrap();
        if let Some(flag) = file_translate {
            doc.set_attribute(file, "translate", yes_no(*flag)).unwrap();
        }
        let group = doc.append_with(file, K::Group, &[("id", next("g").as_str())]).unwrap();
        if let Some(flag) = group_translate {
            doc.set_attribute(group, "translate", yes_no(*flag)).unwrap();
        }

        for shape in shapes {
            let parent = if shape.grouped { group } else { file };
            let unit = doc.append_with(parent, K::Unit, &[("id", next("u").as_str())]).unwrap();
            if let Some(flag) = shape.translate {
                doc.set_attribute(unit, "translate", yes_no(flag)).unwrap();
            }
            // The candidate comes first so lookups meet it before the segments
            let candidate = shape.candidate.map(|with_id| {
                let matches = doc.append(unit, K::Matches).unwrap();
                let candidate = doc.append(matches, K::Match).unwrap();
                if with_id {
                    doc.set_attribute(candidate, "id", next("m")).unwrap();
                }
                candidate
            });
            let mut first_code = None;
            for _ in 0..shape.segments {
                let segment_id = next("s");
                let segment = doc.append_with(unit, K::Segment, &[("id", segment_id.as_str())]).unwrap();
                let source = doc.append(segment, K::Source).unwrap();
                let code = next("p");
                doc.append_with(source, K::StandaloneCode, &[("id", code.as_str())]).unwrap();
                if shape.targets {
                    let target = doc.append(segment, K::Target).unwrap();
                    doc.append_with(target, K::StandaloneCode, &[("id", code.as_str())]).unwrap();
                }
                first_code.get_or_insert((segment_id, code));
            }
            if let (Some(candidate), Some((segment_id, code))) = (candidate, &first_code) {
                doc.set_attribute(candidate, "ref", format!("#{}", segment_id)).unwrap();
                let source = doc.append(candidate, K::Source).unwrap();
                doc.append_with(source, K::StandaloneCode, &[("id", code.as_str())]).unwrap();
                let target = doc.append(candidate, K::Target).unwrap();
                doc.append_with(target, K::StandaloneCode, &[("id", code.as_str())]).unwrap();
            }
            if shape.ignorable {
                let ignorable = doc.append_with(unit, K::Ignorable, &[("id", next("i").as_str())]).unwrap();
                let source = doc.append(ignorable, K::Source).unwrap();
                doc.append_text(source, " ").unwrap();
            }
            if shape.notes {
                let notes = doc.append(unit, K::Notes).unwrap();
                let note = doc.append_with(notes, K::Note, &[("id", next("n").as_str())]).unwrap();
                doc.append_text(note, "note").unwrap();
            }
            if shape.glossary {
                let glossary = doc.append(unit, K::Glossary).unwrap();
                let entry = doc
                    .append_with(glossary, K::GlossaryEntry, &[("id", next("e").as_str())])
                    .unwrap();
                let term = doc.append(entry, K::Term).unwrap();
                doc.append_text(term, "term").unwrap();
                let translation = doc
                    .append_with(entry, K::Translation, &[("id", next("t").as_str())])
                    .unwrap();
                doc.append_text(translation, "terme").unwrap();
            }
            let grouped_flag = if shape.grouped { *group_translate } else { None };
            units.push((unit, shape.translate, grouped_flag, *file_translate));
        }
    }
    (doc, units)
}

fn files() -> impl Strategy<Value = Vec<(Option<bool>, Option<bool>, Vec<UnitShape>)>> {
    prop::collection::vec(
        (
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            prop::collection::vec(unit_shape(), 1..4),
        ),
        1..3,
    )
}

proptest! {
    #[test]
    fn prop_selector_paths_resolve_to_their_node(files in files()) {
        let (doc, _) = build(&files);
        for node in doc.descendants(doc.root()) {
            if selector_id(&doc, node).is_none() {
                continue;
            }
            let path = selector_path(&doc, node);
            prop_assert_eq!(resolve(&doc, &path), Some(node), "path {}", path);
        }
    }

    #[test]
    fn prop_translate_comes_from_nearest_ancestor(files in files()) {
        let (doc, units) = build(&files);
        for (unit, own, group, file) in units {
            let expected = own.or(group).or(file).map(yes_no).unwrap_or("yes");
            let actual = doc.effective_value(unit, "translate").unwrap();
            prop_assert_eq!(actual.as_deref(), Some(expected));
        }
    }
}

#[test]
fn test_target_tags_use_the_target_prefix() {
    let files = vec![(
        None,
        None,
        vec![UnitShape {
            grouped: true,
            segments: 1,
            targets: true,
            ..UnitShape::default()
        }],
    )];
    let (doc, _) = build(&files);
    let paths: Vec<String> = doc
        .descendants(doc.root())
        .filter(|n| selector_id(&doc, *n).is_some())
        .map(|n| selector_path(&doc, n))
        .collect();
    assert_eq!(
        paths,
        vec![
            "#/f=f1".to_string(),
            "#/f=f1/g=g2".to_string(),
            "#/f=f1/g=g2/u=u3".to_string(),
            "#/f=f1/g=g2/u=u3/s4".to_string(),
            "#/f=f1/g=g2/u=u3/p5".to_string(),
            "#/f=f1/g=g2/u=u3/t=p5".to_string(),
        ]
    );
}

#[test]
fn test_relative_resolution_from_unit() {
    let files = vec![(
        None,
        None,
        vec![UnitShape {
            grouped: false,
            segments: 2,
            targets: false,
            ..UnitShape::default()
        }],
    )];
    let (doc, units) = build(&files);
    let unit = units[0].0;
    let second = resolve_from(&doc, unit, "#s6").unwrap();
    assert_eq!(doc.kind(second), K::Segment);
    assert_eq!(resolve_from(&doc, unit, "#u3"), None);
    assert_eq!(resolve(&doc, "#/f=f1/u=u3/p7"), Some(doc.children(doc.children(second)[0])[0]));
}

#[test]
fn test_codes_of_a_match_without_id_do_not_shadow_the_unit() {
    let shape = UnitShape {
        segments: 1,
        candidate: Some(false),
        ..UnitShape::default()
    };
    let (doc, units) = build(&[(None, None, vec![shape])]);
    let unit = doc.get(units[0].0);
    let segment_code = unit
        .child(K::Segment)
        .and_then(|s| s.child(K::Source))
        .and_then(|s| s.child(K::StandaloneCode))
        .unwrap();
    let match_code = unit
        .child(K::Matches)
        .and_then(|m| m.child(K::Match))
        .and_then(|m| m.child(K::Source))
        .and_then(|s| s.child(K::StandaloneCode))
        .unwrap();

    assert_eq!(segment_code.xml_id(), match_code.xml_id());
    assert_eq!(match_code.selector_id(), None);
    assert_eq!(resolve(&doc, &segment_code.selector_path()), Some(segment_code.node_id()));
    assert!(xliff::validate(&doc).is_ok());
}

#[test]
fn test_source_language_is_inherited_from_the_document() {
    let (doc, units) = build(&[(
        None,
        None,
        vec![UnitShape {
            grouped: false,
            segments: 1,
            targets: true,
            ..UnitShape::default()
        }],
    )]);
    let unit = doc.get(units[0].0);
    let segment = unit.child(K::Segment).unwrap();
    let source = segment.child(K::Source).unwrap();
    let target = segment.child(K::Target).unwrap();
    assert_eq!(source.attr("xml:lang"), None);
    assert_eq!(source.value("xml:lang").as_deref(), Some("en"));
    assert_eq!(target.value("xml:lang").as_deref(), Some("fr"));
}
