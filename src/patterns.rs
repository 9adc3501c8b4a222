//! Text patterns for detecting and removing a component's import and elements.

use crate::error::{Result, StripError};
use regex::Regex;

/// One unit of a single-line attribute list: a plain character, or a `{...}`
/// expression (one level of nested braces) that may contain `<`, `>` and `=>`
const ATTR: &str = r"(?:[^<>{}\n]|\{(?:[^{}\n]|\{[^{}\n]*\})*\})";
const ATTR_LAST: &str = r"(?:[^/<>{}\n]|\{(?:[^{}\n]|\{[^{}\n]*\})*\})";

/// Compiled patterns for one target component (e.g. "Header")
#[derive(Debug, Clone)]
pub struct ComponentPatterns {
    pub name: String,
    /// `import Name from './path'`, either quote style, optional `;`
    pub import: Regex,
    /// `<Name />` or `<Name attr="x" />`, attributes on a single line
    pub self_closing: Regex,
    /// `<Name ...> ... </Name>`, body may span lines, first closing tag wins
    pub paired: Regex,
}

impl ComponentPatterns {
    pub fn new(name: &str) -> Result<Self> {
        let escaped = regex::escape(name);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|source| StripError::Pattern {
                name: name.to_string(),
                source,
            })
        };

        Ok(ComponentPatterns {
            name: name.to_string(),
            import: compile(format!(
                r#"import\s+{escaped}\s+from\s+(?:'[^'\n]*'|"[^"\n]*")[ \t]*;?"#
            ))?,
            self_closing: compile(format!(r"<{escaped}(?:\s{ATTR}*?)?\s*/>"))?,
            // The opening tag may not end in `/`, so a self-closing element is
            // never taken for the start of a paired one.
            paired: compile(format!(
                r"(?s)<{escaped}(?:\s{ATTR}*?{ATTR_LAST})?\s*>.*?</{escaped}\s*>"
            ))?,
        })
    }

    pub fn has_import(&self, content: &str) -> bool {
        self.import.is_match(content)
    }

    pub fn has_usage(&self, content: &str) -> bool {
        self.self_closing.is_match(content) || self.paired.is_match(content)
    }

    /// Placeholder left where the import statement used to be
    pub fn import_placeholder(&self) -> String {
        format!("// {} import removed", self.name)
    }
}

/// Compile patterns for every configured component name
pub fn compile_patterns(names: &[String]) -> Result<Vec<ComponentPatterns>> {
    names.iter().map(|name| ComponentPatterns::new(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ComponentPatterns {
        ComponentPatterns::new("Header").unwrap()
    }

    #[test]
    fn test_import_either_quote_style() {
        let p = header();
        assert!(p.has_import("import Header from './Header'"));
        assert!(p.has_import("import Header from \"../components/Header\";"));
        assert!(p.has_import("import   Header\tfrom '@/components/Header'"));
    }

    #[test]
    fn test_import_requires_exact_name() {
        let p = header();
        assert!(!p.has_import("import HeaderBar from './HeaderBar'"));
        assert!(!p.has_import("import { Header } from './Header'"));
        assert!(!p.has_import("// Header import removed"));
    }

    #[test]
    fn test_import_match_includes_semicolon() {
        let p = header();
        let m = p.import.find("import Header from './Header';\nnext").unwrap();
        assert_eq!(m.as_str(), "import Header from './Header';");
    }

    #[test]
    fn test_self_closing_usage() {
        let p = header();
        assert!(p.has_usage("<Header />"));
        assert!(p.has_usage("<Header/>"));
        assert!(p.has_usage("<Header title=\"Shop\" sticky />"));
        assert!(!p.has_usage("<HeaderBar />"));
        assert!(!p.has_usage("<Header.Title />"));
    }

    #[test]
    fn test_expression_attributes() {
        let p = header();
        assert!(p.has_usage("<Header onMenu={() => open()} />"));
        assert!(p.has_usage("<Header style={{ color: 'red' }} sticky />"));
        assert_eq!(
            p.paired
                .find("<Header onClick={() => go(a > b)}>menu</Header>")
                .unwrap()
                .as_str(),
            "<Header onClick={() => go(a > b)}>menu</Header>"
        );
        assert!(p.paired.find("<Header render={() => x} />").is_none());
    }

    #[test]
    fn test_paired_usage_spans_lines() {
        let p = header();
        assert!(p.has_usage("<Header>\n  <Logo/>\n</Header>"));
        assert!(p.has_usage("<Header className=\"top\">text</Header >"));
    }

    #[test]
    fn test_paired_is_non_greedy() {
        let p = header();
        let content = "<Header>a</Header>\n<main/>\n<Header>b</Header>";
        let m = p.paired.find(content).unwrap();
        assert_eq!(m.as_str(), "<Header>a</Header>");
    }

    #[test]
    fn test_paired_does_not_start_at_self_closing() {
        let p = header();
        assert!(p.paired.find("<Header a=\"1\" />\n<div></div>").is_none());
    }

    #[test]
    fn test_import_placeholder() {
        assert_eq!(header().import_placeholder(), "// Header import removed");
    }
}
