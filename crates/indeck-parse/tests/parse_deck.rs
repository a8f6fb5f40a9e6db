//! End-to-end tests over realistic decks.

use indeck_parse::{Parser, parse};
use indeck_parse::{ParseErrorKind, Value};
use pretty_assertions::assert_eq;

const WATER_DECK: &str = "\
&GLOBAL
  PROJECT water          ! project name
  RUN_TYPE ENERGY
&END GLOBAL
@SET LATTICE 2.8595
&FORCE_EVAL
  METHOD Quickstep
  &DFT
    BASIS_SET_FILE_NAME BASIS_MOLOPT
    &SCF
      SCF_GUESS ATOMIC
      MAX_SCF 50  # iteration cap
    &END SCF
  &END DFT
  &SUBSYS
    &CELL
      A ${LATTICE} 0.0 0.0
      B 0.0 ${LATTICE} 0.0
      C 0.0 0.0 ${LATTICE}
    &END CELL
    &KIND Na
      BASIS_SET DZVP-MOLOPT-SR-GTH
      POTENTIAL GTH-PBE-q9
    &END KIND
  &END SUBSYS
&END FORCE_EVAL
";

#[test]
fn parses_a_realistic_deck() {
    let doc = parse(WATER_DECK).unwrap();

    assert_eq!(doc.get_keyword("GLOBAL/PROJECT").unwrap().values[0], "water");
    assert_eq!(
        doc.get_keyword("FORCE_EVAL/DFT/SCF/MAX_SCF").unwrap().values,
        vec![Value::from("50")]
    );

    let cell = doc.get_section("FORCE_EVAL/SUBSYS/CELL").unwrap();
    let a = cell.keyword("A").unwrap();
    assert_eq!(a.values[0], "2.8595");
    assert_eq!(a.values[1], "0.0");

    let kind = doc.get_section("FORCE_EVAL/SUBSYS/KIND").unwrap();
    assert_eq!(kind.parameter.as_deref(), Some("Na"));

    // 7 matched &NAME...&END pairs, 7 section nodes
    assert_eq!(doc.section_count(), 7);
}

#[test]
fn expansion_scenario_from_cell_keywords() {
    let doc = parse("@SET LATTICE 2.8595\n&CELL\n  A 0 ${LATTICE} ${LATTICE}\n&END CELL").unwrap();
    let a = doc.get_keyword("CELL/A").unwrap();
    assert_eq!(
        a.values,
        vec![Value::from("0"), Value::from("2.8595"), Value::from("2.8595")]
    );
}

#[test]
fn conditional_blocks_prune_sections_entirely() {
    let deck = "\
@IF 0
&PRINT
  EACH 1
&END PRINT
@ENDIF
&GLOBAL
&END GLOBAL
";
    let doc = parse(deck).unwrap();
    assert!(doc.section("PRINT").is_none());
    assert_eq!(doc.section_count(), 1);
}

#[test]
fn undefined_variable_fails_at_referencing_line() {
    let err = parse("&CELL\n  A ${UNSET}\n&END CELL").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UndefinedVariable("UNSET".into()));
    assert_eq!(err.line, 2);
}

#[test]
fn unclosed_section_reports_open_names() {
    let err = parse("&FORCE_EVAL\n&DFT\n&END DFT").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnclosedSection(vec!["FORCE_EVAL".into()])
    );
}

#[test]
fn quoted_value_is_not_truncated_by_comment_chars() {
    let doc = parse("NAME \"a#b\"").unwrap();
    assert_eq!(doc.keyword("NAME").unwrap().values[0], "a#b");
}

#[test]
fn roundtrip_through_canonical_text_is_stable() {
    let doc = parse(WATER_DECK).unwrap();
    let canonical = doc.to_deck_string();
    let reparsed = parse(&canonical).unwrap();
    assert_eq!(doc, reparsed);

    // and the canonical form is a fixed point
    assert_eq!(reparsed.to_deck_string(), canonical);
}

#[test]
fn seed_overrides_interact_with_set_in_order() {
    let parser = Parser::new().with_variable("LATTICE", "9.0");
    let doc = parser
        .parse("&CELL\n  A ${LATTICE}\n&END CELL\n@SET LATTICE 1.0\nB ${LATTICE}")
        .unwrap();
    assert_eq!(doc.get_keyword("CELL/A").unwrap().values[0], "9.0");
    assert_eq!(doc.keyword("B").unwrap().values[0], "1.0");
}
