use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assembler::{Notice, SectionMap, SourceUnit, transform};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based line of the body.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Section the body is transformed under. None transforms it as a
    /// top-level file.
    #[serde(default)]
    pub section: Option<String>,

    /// File stem used in anchors. Defaults to the fixture name.
    #[serde(default)]
    pub stem: Option<String>,

    /// Page to section lookup for links to other pages.
    #[serde(default)]
    pub pages: BTreeMap<String, String>,

    #[serde(default = "default_section")]
    pub default_section: String,

    /// Expected transformed text (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Expected warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

fn default_section() -> String {
    "Reference".to_string()
}

impl TestConfig {
    fn section_map(&self) -> SectionMap {
        let mut map = SectionMap::new(self.default_section.clone());
        for (page, section) in &self.pages {
            map.insert(page.clone(), section.clone());
        }
        map
    }
}

/// Split a `.test.md` file into its TOML config and markdown body.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, body))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

/// Fixture name without the `.test.md` suffix.
fn fixture_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".test.md").unwrap_or(&name).to_string()
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (config, body) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let description = config.description.clone();
    let stem = config.stem.clone().unwrap_or_else(|| fixture_stem(path));
    let mut unit = SourceUnit::new(body, stem);
    if let Some(section) = &config.section {
        unit = unit.with_section(section.clone());
    }

    let mut notices = Vec::new();
    let doc = transform(&unit, &config.section_map(), &mut notices);
    let output = doc.to_text();

    let mut outcome = TestOutcome::Pass;
    if let Some(expected) = &config.expect_output {
        let actual = output.trim();
        let expected = expected.trim();
        if actual != expected {
            outcome = TestOutcome::Fail(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(expected),
                indent(actual)
            ));
        }
    }

    let output_ok = matches!(outcome, TestOutcome::Pass);
    if let (true, Some(expected)) = (output_ok, &config.expect_warnings) {
        if let Some(reason) = check_warnings(body, &notices, expected) {
            outcome = TestOutcome::Fail(reason);
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(source: &str, notices: &[Notice], expected: &[ExpectedWarning]) -> Option<String> {
    let actual_warnings: Vec<&Notice> = notices.iter().filter(|n| n.is_warning()).collect();

    if actual_warnings.len() != expected.len() {
        let actual_msgs: Vec<String> = actual_warnings
            .iter()
            .map(|w| format!("  - {}", w))
            .collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            actual_warnings.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in actual_warnings.iter().zip(expected.iter()).enumerate() {
        let msg = actual.to_string();

        if !msg.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }

        if let Some(expected_line) = expected.line {
            match &actual.span {
                Some(span) => {
                    let actual_line = byte_offset_to_line(source, span.start);
                    if actual_line != expected_line {
                        return Some(format!(
                            "warning[{}]: expected on line {}, but span is on line {}",
                            i, expected_line, actual_line
                        ));
                    }
                }
                None => {
                    return Some(format!(
                        "warning[{}]: expected on line {}, but warning has no span",
                        i, expected_line
                    ));
                }
            }
        }
    }

    None
}

/// Discover `.test.md` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.md") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn label_of(result: &TestResult) -> String {
    result
        .description
        .clone()
        .unwrap_or_else(|| fixture_stem(&result.path))
}

/// Run all `.test.md` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let run_categories: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no .test.md files found in {}", path.display());
            return 1;
        }
        filter_categories(all_categories, categories)
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        if !path.is_file() {
            let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
            eprintln!();
            eprintln!("{}", bold(header, no_color));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label_of(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), label_of(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let verdict = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            verdict,
            passed,
            failed,
            passed + failed
        );
        1
    }
}

fn filter_categories(
    all_categories: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    if requested.is_empty() {
        return all_categories;
    }

    let mut filtered = BTreeMap::new();
    for requested in requested {
        let req = requested.trim_matches('/');
        let mut found = false;
        for (cat, files) in &all_categories {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.clone(), files.clone());
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all_categories
                    .keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn bundled_fixtures_pass() {
        let categories = discover_categorized(&fixtures());
        assert!(!categories.is_empty());
        for path in categories.values().flatten() {
            if let TestOutcome::Fail(reason) = run_single_test(path).outcome {
                panic!("{}: {}", path.display(), reason);
            }
        }
    }

    #[test]
    fn fixtures_are_grouped_by_folder() {
        let categories = discover_categorized(&fixtures());
        assert!(categories.contains_key("references"));
        assert!(categories.contains_key("links"));
        assert!(categories.contains_key("tables"));
    }

    #[test]
    fn frontmatter_and_body() {
        let (config, body) =
            parse_test_file("---\ndescription = \"x\"\nsection = \"Guide\"\n---\n# Title\n").unwrap();
        assert_eq!(config.description.as_deref(), Some("x"));
        assert_eq!(config.section.as_deref(), Some("Guide"));
        assert_eq!(body, "# Title\n");
    }

    #[test]
    fn missing_frontmatter() {
        assert!(parse_test_file("# Title\n").is_err());
        assert!(parse_test_file("---\nsection = \"Guide\"\n# Title\n").is_err());
    }

    #[test]
    fn failing_expectation_is_reported() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("wrong.test.md");
        std::fs::write(&path, "---\nexpect_output = \"# Other\"\n---\n# Title\n").unwrap();
        let result = run_single_test(&path);
        assert!(matches!(result.outcome, TestOutcome::Fail(ref reason) if reason.contains("output mismatch")));
        assert_eq!(run_tests(&path, true, &[]), 1);
    }

    #[test]
    fn warnings_are_checked_with_lines() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("refs.test.md");
        std::fs::write(
            &path,
            "---\nexpect_warnings = [{ contains = \"[gone]\", line = 3 }]\n---\n# Title\n\nSee [gone].\n",
        )
        .unwrap();
        assert!(matches!(run_single_test(&path).outcome, TestOutcome::Pass));
    }
}
