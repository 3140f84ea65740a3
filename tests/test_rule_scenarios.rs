use pretty_assertions::assert_eq;
use vhdl_style_linter::config::Config;
use vhdl_style_linter::rule_list::RuleList;
use vhdl_style_linter::{check_source, fix_source};

fn fix(source: &str) -> String {
    let (fixed, report) = fix_source(source, &RuleList::new(), &Config::default()).unwrap();
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(report.violations.is_empty(), "{:?}", report.violations);
    fixed
}

fn rule_ids(source: &str) -> Vec<String> {
    check_source(source, &RuleList::new(), &Config::default())
        .unwrap()
        .violations
        .into_iter()
        .map(|v| v.rule_id)
        .collect()
}

#[test]
fn test_context_reference_spacing() {
    assert_eq!(rule_ids("context   c1;\n"), vec!["context_ref_002"]);
    assert_eq!(fix("context   c1;\n"), "context c1;\n");
    assert_eq!(fix("context   lib.c1;\n"), "context lib.c1;\n");
}

#[test]
fn test_blank_line_below_process_begin() {
    let source = "\
architecture rtl of e is
begin
  proc : process (clk) is
  begin
    q <= d;
  end process proc;
end architecture rtl;
";
    assert_eq!(rule_ids(source), vec!["process_022"]);
    assert_eq!(
        fix(source),
        "\
architecture rtl of e is
begin
  proc : process (clk) is
  begin

    q <= d;
  end process proc;
end architecture rtl;
"
    );
}

#[test]
fn test_missing_end_keywords_are_inserted() {
    let source = "entity e is\nend e;\n\narchitecture rtl of e is\nbegin\nend rtl;\n\npackage p is\nend;\n";
    assert_eq!(
        rule_ids(source),
        vec!["entity_010", "architecture_010", "package_008"]
    );
    assert_eq!(
        fix(source),
        "entity e is\nend entity e;\n\narchitecture rtl of e is\nbegin\nend architecture rtl;\n\npackage p is\nend package;\n"
    );
}

#[test]
fn test_inline_comments_of_instantiations_are_aligned() {
    let source = "\
architecture rtl of e is
begin
u0 : a;  -- x
u1 : b;       -- y
u2 : c;    -- z
end architecture rtl;
";
    let fixed = fix(source);
    let lines: Vec<&str> = fixed.lines().collect();
    assert_eq!(lines[2], "u0 : a;       -- x");
    assert_eq!(lines[3], "u1 : b;       -- y");
    assert_eq!(lines[4], "u2 : c;       -- z");
    for line in &lines[2..5] {
        assert_eq!(line.find("--"), Some(14), "comment not at column 15: {}", line);
    }
}

#[test]
fn test_full_line_comments_are_not_moved() {
    let source = "\
architecture rtl of e is
begin
  u0 : a    -- first
    -- about the port map
    port map (p);  -- second
end architecture rtl;
";
    let fixed = fix(source);
    let lines: Vec<&str> = fixed.lines().collect();
    assert_eq!(lines[2], format!("  u0 : a{}-- first", " ".repeat(11)));
    assert_eq!(lines[3], "    -- about the port map");
    assert_eq!(lines[4], "    port map (p);  -- second");
}

#[test]
fn test_port_map_is_moved_to_its_own_line() {
    let source = "\
architecture rtl of e is
begin
  u0 : entity work.sub port map (a => s);
end architecture rtl;
";
    assert_eq!(rule_ids(source), vec!["instantiation_013"]);
    assert_eq!(
        fix(source),
        "\
architecture rtl of e is
begin
  u0 : entity work.sub
    port map (a => s);
end architecture rtl;
"
    );
}

#[test]
fn test_keyword_case_is_lowered() {
    let source = "ARCHITECTURE rtl OF e IS\nbegin\n  PROCESS\n  begin\n\n    wait;\n  end PROCESS;\nEND ARCHITECTURE;\n";
    assert_eq!(
        rule_ids(source),
        vec!["architecture_004", "process_004", "process_004", "architecture_004"]
    );
    let fixed = fix(source);
    assert!(fixed.starts_with("architecture rtl OF e IS\n"));
    assert!(fixed.contains("  process\n"));
    assert!(fixed.contains("  end process;\n"));
    assert!(fixed.ends_with("END architecture;\n"));
}

#[test]
fn test_attribute_colon_gets_a_space() {
    let source = "\
architecture rtl of e is

  attribute keep : boolean;
  attribute keep of s: signal is true;
begin
end architecture rtl;
";
    assert_eq!(rule_ids(source), vec!["entity_specification_101"]);
    assert!(fix(source).contains("  attribute keep of s : signal is true;\n"));
}

#[test]
fn test_iteration_scheme_spacing() {
    let source = "\
architecture rtl of e is
begin
  process
  begin

    for    i in 0 to 3 loop
      null;
    end loop;
    while  busy loop
      wait;
    end loop;
  end process;
end architecture rtl;
";
    assert_eq!(rule_ids(source), vec!["iteration_scheme_101", "iteration_scheme_100"]);
    let fixed = fix(source);
    assert!(fixed.contains("    for i in 0 to 3 loop\n"));
    assert!(fixed.contains("    while busy loop\n"));
}
