//! Integration tests for the standard validator
//!
//! Documents are either loaded from XML or built through the tree API; each test
//! checks the first reported error code and, where it matters, its path.

use pretty_assertions::assert_eq;
use xliff::loaders::load_str;
use xliff::{validate, Document, ElementKind as K, ErrorCode, NodeId, StandardValidator};

const VALID: &str = include_str!("fixtures/valid.xlf");

fn wrap(units: &str) -> String {
    format!(
        r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en" trgLang="fr">
             <file id="f1">{}</file>
           </xliff>"#,
        units
    )
}

fn code_of(xml: &str) -> Option<ErrorCode> {
    let doc = load_str(xml).expect("fixture loads");
    validate(&doc).err().map(|e| e.code())
}

/// Document with one file, one unit and one segment holding `source`
fn built() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    doc.set_attribute(root, "version", "2.0").unwrap();
    doc.set_attribute(root, "srcLang", "en").unwrap();
    let file = doc.append_with(root, K::File, &[("id", "f1")]).unwrap();
    let unit = doc.append_with(file, K::Unit, &[("id", "u1")]).unwrap();
    let seg = doc.append_with(unit, K::Segment, &[("id", "s1")]).unwrap();
    let source = doc.append(seg, K::Source).unwrap();
    (doc, file, unit, source)
}

// ============================================================================
// Whole documents
// ============================================================================

#[test]
fn test_minimal_document_without_target_language() {
    let (mut doc, _, _, source) = built();
    doc.append_text(source, "Hello").unwrap();
    assert!(validate(&doc).is_ok());
}

#[test]
fn test_fixture_document_is_valid() {
    let doc = load_str(VALID).unwrap();
    if let Err(err) = validate(&doc) {
        panic!("unexpected validation error: {}", err);
    }
}

#[test]
fn test_validator_is_reusable() {
    let doc = load_str(VALID).unwrap();
    let mut validator = StandardValidator::new();
    assert!(validator.validate(&doc).is_ok());
    assert!(validator.validate(&doc).is_ok());
}

#[test]
fn test_target_requires_target_language() {
    let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
        <file id="f1"><unit id="u1"><segment><source>a</source><target>b</target></segment></unit></file>
      </xliff>"#;
    assert_eq!(code_of(xml), Some(ErrorCode::MissingTargetLanguage));
}

#[test]
fn test_explicit_source_language_must_match() {
    let xml = wrap(r#"<unit id="u1"><segment><source xml:lang="de">a</source></segment></unit>"#);
    assert_eq!(code_of(&xml), Some(ErrorCode::SourceLanguageMismatch));
}

#[test]
fn test_explicit_target_language_must_match() {
    let xml = wrap(
        r#"<unit id="u1"><segment><source>a</source><target xml:lang="de">b</target></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::TargetLanguageMismatch));

    let xml = wrap(
        r#"<unit id="u1"><segment><source>a</source><target xml:lang="fr">b</target></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_file_needs_a_unit_or_group() {
    assert_eq!(code_of(&wrap("")), Some(ErrorCode::EmptyFile));
    assert_eq!(
        code_of(&wrap(r#"<notes><note>only a note</note></notes>"#)),
        Some(ErrorCode::EmptyFile)
    );
    assert_eq!(
        code_of(&wrap(r#"<group id="g1"><unit id="u1"><segment><source>a</source></segment></unit></group>"#)),
        None
    );
}

#[test]
fn test_skeleton_has_href_or_content() {
    let unit = r#"<unit id="u1"><segment><source>a</source></segment></unit>"#;

    let xml = wrap(&format!("<skeleton/>{}", unit));
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidSkeleton));

    let xml = wrap(&format!(r#"<skeleton href="skel.xml">inline</skeleton>{}"#, unit));
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidSkeleton));

    let xml = wrap(&format!(r#"<skeleton href="skel.xml"/>{}"#, unit));
    assert_eq!(code_of(&xml), None);

    let xml = wrap(&format!("<skeleton>raw skeleton</skeleton>{}", unit));
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_note_priority_range() {
    let note = |priority: &str| {
        wrap(&format!(
            r#"<unit id="u1"><notes><note priority="{}">check</note></notes>
                 <segment><source>a</source></segment></unit>"#,
            priority
        ))
    };
    assert_eq!(code_of(&note("0")), Some(ErrorCode::InvalidNotePriority));
    assert_eq!(code_of(&note("11")), Some(ErrorCode::InvalidNotePriority));
    assert_eq!(code_of(&note("1")), None);
    assert_eq!(code_of(&note("10")), None);
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_missing_data_reference() {
    let (mut doc, _, _, source) = built();
    doc.append_with(source, K::StandaloneCode, &[("id", "1"), ("dataRef", "d1")])
        .unwrap();
    let err = validate(&doc).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDataReference);
    assert_eq!(err.path(), Some("#/f=f1/u=u1/1"));
}

#[test]
fn test_duplicate_file_note() {
    let (mut doc, file, _, source) = built();
    doc.append_text(source, "Hello").unwrap();
    let notes = doc.create(K::Notes);
    doc.attach_child(file, notes).unwrap();
    doc.append_with(notes, K::Note, &[("id", "n1")]).unwrap();
    doc.append_with(notes, K::Note, &[("id", "n1")]).unwrap();

    let err = validate(&doc).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateId);
    assert_eq!(err.path(), Some("#/f=f1/n=n1"));
}

#[test]
fn test_duplicate_file_ids() {
    let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
        <file id="f1"><unit id="u1"><segment><source>a</source></segment></unit></file>
        <file id="f1"><unit id="u1"><segment><source>b</source></segment></unit></file>
      </xliff>"#;
    assert_eq!(code_of(xml), Some(ErrorCode::DuplicateFileId));
}

#[test]
fn test_duplicate_group_ids() {
    let xml = wrap(
        r#"<group id="g1"><unit id="u1"><segment><source>a</source></segment></unit></group>
           <group id="g2"><group id="g1"><unit id="u2"><segment><source>b</source></segment></unit></group></group>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::DuplicateGroupId));

    let xml = wrap(
        r#"<group id="g1"><unit id="u1"><segment><source>a</source></segment></unit></group>
           <group id="g2"><group id="g3"><unit id="u2"><segment><source>b</source></segment></unit></group></group>"#,
    );
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_segment_and_inline_ids_share_a_scope() {
    let xml = wrap(
        r#"<unit id="u1">
             <segment id="x"><source>a <ph id="x"/></source></segment>
           </unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::DuplicateId));
}

#[test]
fn test_target_tags_have_their_own_scope() {
    let xml = wrap(
        r#"<unit id="u1">
             <segment id="x"><source><ph id="1"/></source><target><ph id="1"/></target></segment>
           </unit>"#,
    );
    assert_eq!(code_of(&xml), None);
}

// ============================================================================
// Inline tags
// ============================================================================

#[test]
fn test_end_tag_before_start_tag() {
    let xml = wrap(
        r#"<unit id="u1"><segment><source><ec startRef="1"/>x<sc id="1"/></source></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::StartTagAfterEnd));
}

#[test]
fn test_unmatched_start_tag() {
    let xml = wrap(r#"<unit id="u1"><segment><source><sc id="1"/>x</source></segment></unit>"#);
    assert_eq!(code_of(&xml), Some(ErrorCode::UnmatchedStartTag));
}

#[test]
fn test_isolated_start_tag_passes() {
    let xml = wrap(
        r#"<unit id="u1"><segment><source><sc id="1" isolated="yes"/>x</source></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_spanning_code_halves_must_agree() {
    let xml = wrap(
        r#"<unit id="u1"><segment><source><sc id="1" canCopy="no"/>x<ec startRef="1"/></source></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::CanCopyMismatch));
}

#[test]
fn test_every_mirrored_property_is_compared() {
    let hints = r#"canCopy="no" canDelete="no""#;
    let cases = [
        (
            r#"canDelete="no""#.to_string(),
            String::new(),
            ErrorCode::CanDeleteMismatch,
        ),
        (
            format!(r#"canReorder="firstNo" {}"#, hints),
            hints.to_string(),
            ErrorCode::CanReorderMismatch,
        ),
        (r#"dir="rtl""#.to_string(), String::new(), ErrorCode::DirectionalityMismatch),
        (r#"type="fmt""#.to_string(), String::new(), ErrorCode::TypeMismatch),
        (
            r#"type="fmt" subType="xlf:b""#.to_string(),
            r#"type="fmt" subType="xlf:i""#.to_string(),
            ErrorCode::SubTypeMismatch,
        ),
    ];
    for (start, end, code) in cases {
        let pair = |end: &str| {
            wrap(&format!(
                r#"<unit id="u1"><segment><source><sc id="1" {}/>x<ec startRef="1" {}/></source></segment></unit>"#,
                start, end
            ))
        };
        assert_eq!(code_of(&pair(&end)), Some(code), "start {} end {}", start, end);
        assert_eq!(code_of(&pair(&start)), None, "start and end {}", start);
    }
}

#[test]
fn test_pairs_span_segments_of_a_unit() {
    let xml = wrap(
        r#"<unit id="u1">
             <segment><source><sc id="1"/>one</source></segment>
             <segment><source>two<ec startRef="1"/></source></segment>
           </unit>"#,
    );
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_undeletable_code_must_reach_the_target() {
    let xml = wrap(
        r#"<unit id="u1"><segment>
             <source>a <ph id="1" canDelete="no"/></source>
             <target>b</target>
           </segment></unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::MissingUndeletableTag));
}

#[test]
fn test_undeletable_pair_may_fold_into_pc() {
    let xml = wrap(
        r#"<unit id="u1"><segment>
             <source><sc id="1" canDelete="no"/>a<ec startRef="1" canDelete="no"/></source>
             <target><pc id="1" canDelete="no">b</pc></target>
           </segment></unit>"#,
    );
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_copy_of_must_name_a_tag_of_the_same_kind() {
    let xml = wrap(
        r#"<unit id="u1"><segment>
             <source><ph id="1"/></source>
             <target><ph id="1"/><ph id="2" copyOf="1"/></target>
           </segment></unit>"#,
    );
    assert_eq!(code_of(&xml), None);

    let xml = wrap(
        r#"<unit id="u1"><segment>
             <source><ph id="1"/><pc id="2">x</pc></source>
             <target><ph id="1"/><ph id="3" copyOf="2"/></target>
           </segment></unit>"#,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidCopyOf));
}

#[test]
fn test_code_point_must_be_illegal_in_xml() {
    let xml = wrap(r#"<unit id="u1"><segment><source><cp hex="0007"/></source></segment></unit>"#);
    assert_eq!(code_of(&xml), None);
    let xml = wrap(r#"<unit id="u1"><segment><source><cp hex="0041"/></source></segment></unit>"#);
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidCodePoint));
}

// ============================================================================
// Editing-hint sequences
// ============================================================================

#[test]
fn test_sequence_replayed_in_target() {
    let hints = r#"canCopy="no" canDelete="no""#;
    let xml = wrap(&format!(
        r#"<unit id="u1"><segment>
             <source><ph id="a" canReorder="firstNo" {h}/>x<ph id="b" canReorder="no" {h}/></source>
             <target><ph id="a" canReorder="firstNo" {h}/>y<ph id="b" canReorder="no" {h}/></target>
           </segment></unit>"#,
        h = hints
    ));
    assert_eq!(code_of(&xml), None);
}

#[test]
fn test_sequence_broken_in_target() {
    let hints = r#"canCopy="no" canDelete="no""#;
    let xml = wrap(&format!(
        r#"<unit id="u1"><segment>
             <source><ph id="a" canReorder="firstNo" {h}/><ph id="b" canReorder="no" {h}/><ph id="c" canReorder="no" {h}/></source>
             <target><ph id="a" canReorder="firstNo" {h}/><ph id="b" canReorder="no" {h}/><ph id="d" canReorder="no" {h}/><ph id="c" {h}/></target>
           </segment></unit>"#,
        h = hints
    ));
    assert_eq!(code_of(&xml), Some(ErrorCode::SequenceMismatch));
}

// ============================================================================
// References and modules
// ============================================================================

#[test]
fn test_comment_marker_reference() {
    let xml = wrap(
        r##"<unit id="u1">
             <notes><note id="n1">Check this</note></notes>
             <segment><source><mrk id="m1" type="comment" ref="#n=n1">text</mrk></source></segment>
           </unit>"##,
    );
    assert_eq!(code_of(&xml), None);

    let xml = wrap(
        r##"<unit id="u1">
             <segment><source><mrk id="m1" type="comment" ref="#n=n1">text</mrk></source></segment>
           </unit>"##,
    );
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidCommentReference));
}

#[test]
fn test_sub_flows_name_units_of_the_file() {
    let xml = wrap(
        r#"<unit id="u1"><segment><source><ph id="1" subFlows="u2"/></source></segment></unit>
           <unit id="u2"><segment><source>menu</source></segment></unit>"#,
    );
    assert_eq!(code_of(&xml), None);

    let xml = wrap(r#"<unit id="u1"><segment><source><ph id="1" subFlows="u9"/></source></segment></unit>"#);
    assert_eq!(code_of(&xml), Some(ErrorCode::InvalidSubFlows));
}

#[test]
fn test_match_reference_to_unknown_segment() {
    let xml = r##"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0"
            xmlns:mtc="urn:oasis:names:tc:xliff:matches:2.0" version="2.0" srcLang="en" trgLang="fr">
          <file id="f1"><unit id="u1">
            <mtc:matches>
              <mtc:match ref="#s9"><source>a</source><target>b</target></mtc:match>
            </mtc:matches>
            <segment id="s1"><source>a</source></segment>
          </unit></file>
        </xliff>"##;
    assert_eq!(code_of(xml), Some(ErrorCode::InvalidReference));
}

#[test]
fn test_resource_item_needs_a_part() {
    let resource = |item: &str| {
        format!(
            r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0"
                  xmlns:res="urn:oasis:names:tc:xliff:resourcedata:2.0" version="2.0" srcLang="en">
                <file id="f1"><unit id="u1">
                  <res:resourceData>{}</res:resourceData>
                  <segment><source>a</source></segment>
                </unit></file>
              </xliff>"#,
            item
        )
    };
    assert_eq!(
        code_of(&resource(r#"<res:resourceItem id="r1"/>"#)),
        Some(ErrorCode::InvalidResourceItem)
    );
    assert_eq!(
        code_of(&resource(r#"<res:resourceItem id="r1"><res:source/></res:resourceItem>"#)),
        Some(ErrorCode::InvalidResourceItem)
    );
    assert_eq!(
        code_of(&resource(
            r#"<res:resourceItem id="r1"><res:source href="images/logo.png"/></res:resourceItem>"#
        )),
        None
    );
}

#[test]
fn test_duplicate_extension_ids() {
    let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" xmlns:my="urn:example:ext"
            version="2.0" srcLang="en">
          <file id="f1">
            <unit id="u1"><segment><source>a</source></segment></unit>
            <my:a id="x"/>
            <my:b id="x"/>
          </file>
        </xliff>"#;
    assert_eq!(code_of(xml), Some(ErrorCode::DuplicateExtensionId));
}

#[test]
fn test_error_display_carries_code_and_path() {
    let (mut doc, _, _, source) = built();
    doc.append_with(source, K::StandaloneCode, &[("id", "1"), ("dataRef", "d1")])
        .unwrap();
    let rendered = validate(&doc).unwrap_err().to_string();
    assert!(rendered.contains("Code: 70 (InvalidDataReference)"), "{}", rendered);
    assert!(rendered.contains("Path: #/f=f1/u=u1/1"), "{}", rendered);
}
