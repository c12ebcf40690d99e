//! End-to-end formatting scenarios, one per documented behavior.

use indoc::indoc;
use pyproject_fmt::{format, Settings};

#[test]
fn name_canonicalization() {
    let input = indoc! {r"
        [project]
        name = 'a.-..-__B'
    "};
    let output = format(input, &Settings::default()).unwrap();
    assert!(output.contains("name = \"a-b\""));
}

#[test]
fn dependency_sort_and_quoting() {
    let input = indoc! {r#"
        [project]
        name = "x"
        dependencies = [
          "packaging>=20.0;python_version>\"3.4\"",
          "appdirs",
        ]
    "#};
    let output = format(input, &Settings::default()).unwrap();
    let appdirs_pos = output.find("\"appdirs\"").unwrap();
    let packaging_pos = output.find("packaging").unwrap();
    assert!(appdirs_pos < packaging_pos, "appdirs must sort before packaging");
    assert!(output.contains("packaging>=20; python_version > \"3.4\""));
}

#[test]
fn classifier_range_synthesis() {
    let input = indoc! {r#"
        [project]
        name = "x"
        requires-python = ">=3.7,<3.13"
    "#};
    let output = format(input, &Settings::default()).unwrap();
    for minor in 7..=12 {
        assert!(output.contains(&format!("Programming Language :: Python :: 3.{minor}")), "missing 3.{minor} in {output}");
    }
    assert!(output.contains("Programming Language :: Python :: 3 :: Only"));

    let only_pos = output.find("Programming Language :: Python :: 3 :: Only").unwrap();
    let positions: Vec<usize> = (7..=12).map(|minor| output.find(&format!("Programming Language :: Python :: 3.{minor}")).unwrap()).collect();
    assert!(only_pos < positions[0], "3 :: Only must sort before every numbered classifier");
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "classifiers must be in ascending numeric order, not lexicographic: {output}");
}

#[test]
fn duplicate_classifiers_are_preserved() {
    let input = indoc! {r#"
        [project]
        name = "x"
        classifiers = [
          "License :: OSI Approved :: MIT License",
          "License :: OSI Approved :: MIT License",
        ]
    "#};
    let output = format(input, &Settings::default()).unwrap();
    let count = output.matches("License :: OSI Approved :: MIT License").count();
    assert_eq!(count, 2);
}

#[test]
fn entry_points_inline_table_sort() {
    let input = indoc! {r#"
        [project.entry-points.beta]
        D = "d"
        C = "c"

        [project.entry-points.alpha]
        B = "b"
        "A.A" = "a"
    "#};
    let output = format(input, &Settings::default()).unwrap();
    assert!(output.contains("{\"A.A\" = \"a\",B = \"b\"}"));
    assert!(output.contains("{C = \"c\",D = \"d\"}"));
    let alpha_pos = output.find("alpha").unwrap();
    let beta_pos = output.find("beta").unwrap();
    assert!(alpha_pos < beta_pos);
}

#[test]
fn version_trim_toggle() {
    let input = indoc! {r#"
        [project]
        name = "x"
        dependencies = ["A==1.0.0"]
    "#};
    let trimmed = format(input, &Settings::default()).unwrap();
    assert!(trimmed.contains("A==1\""));

    let mut keep_full = Settings::default();
    keep_full.keep_full_version = true;
    let untrimmed = format(input, &keep_full).unwrap();
    assert!(untrimmed.contains("A==1.0.0"));
}

#[test]
fn authorial_classifier_widening() {
    let input = indoc! {r#"
        [project]
        name = "x"
        requires-python = ">=3.10"
        classifiers = [
          "Programming Language :: Python :: 3.9",
        ]
    "#};
    let mut settings = Settings::default();
    settings.max_supported_python = (3, 15);
    let output = format(input, &settings).unwrap();
    assert!(!output.contains("3.9\""));
    for minor in 10..=15 {
        assert!(output.contains(&format!("3.{minor}")));
    }
}

#[test]
fn description_collapse() {
    let input = "[project]\nname = \"x\"\ndescription = \"\"\"\n    A multi-line\n    description.\n\"\"\"\n";
    let output = format(input, &Settings::default()).unwrap();
    assert!(output.contains("description = \"A multi-line description.\""));
}

#[test]
fn scripts_and_gui_scripts_sort_independently() {
    let input = indoc! {r#"
        [project.scripts]
        zeta = "pkg:zeta"
        alpha = "pkg:alpha"

        [project.gui-scripts]
        yankee = "pkg:yankee"
        bravo = "pkg:bravo"
    "#};
    let output = format(input, &Settings::default()).unwrap();
    let scripts_section = &output[output.find("[project.scripts]").unwrap()..output.find("[project.gui-scripts]").unwrap()];
    assert!(scripts_section.find("alpha").unwrap() < scripts_section.find("zeta").unwrap());
    let gui_section = &output[output.find("[project.gui-scripts]").unwrap()..];
    assert!(gui_section.find("bravo").unwrap() < gui_section.find("yankee").unwrap());
}

#[test]
fn mixed_quote_dependency_escapes_double_quote() {
    let input = indoc! {r#"
        [project]
        name = "x"
        dependencies = ["foo; a == \"b\" or a == 'c'"]
    "#};
    let output = format(input, &Settings::default()).unwrap();
    assert!(output.contains(r#""foo; a == \"b\" or a == 'c'""#));
}

#[test]
fn indent_is_configurable_across_dependencies_and_classifiers() {
    let input = indoc! {r#"
        [project]
        name = "x"
        dependencies = ["a"]
    "#};
    let mut settings = Settings::default();
    settings.indent = 4;
    let output = format(input, &settings).unwrap();
    assert!(output.contains("dependencies = [\n    \"a\",\n]"));
}

#[test]
fn formatting_twice_is_a_no_op() {
    let input = indoc! {r#"
        [build-system]
        requires = ["setuptools>=40.8.0"]
        build-backend = "setuptools.build_meta"

        [project]
        name = "Example_Project"
        version = "1.0.0"
        requires-python = ">=3.8"
        dependencies = ["requests>=2.0.0", "click"]
    "#};
    let settings = Settings::default();
    let once = format(input, &settings).unwrap();
    let twice = format(&once, &settings).unwrap();
    assert_eq!(once, twice);
}
