//! Eligibility checks: exclusion by path, then import + usage detection.
//!
//! A file is eligible when at least one target component is both imported and
//! rendered. Excluded files are decided from their path alone and are never
//! read.

use crate::config::StripConfig;
use crate::patterns::ComponentPatterns;
use std::path::Path;

/// What the classifier found for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMatch {
    pub name: String,
    pub has_import: bool,
    pub has_usage: bool,
}

impl ComponentMatch {
    /// Both the import and a rendered element are present
    pub fn is_present(&self) -> bool {
        self.has_import && self.has_usage
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub components: Vec<ComponentMatch>,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        self.components.iter().any(ComponentMatch::is_present)
    }

    /// Names of the components that made the file eligible
    pub fn present(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|c| c.is_present())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Short human-readable form, e.g. "Header: import+usage, Footer: import"
    pub fn describe(&self) -> String {
        self.components
            .iter()
            .map(|c| {
                let found = match (c.has_import, c.has_usage) {
                    (true, true) => "import+usage",
                    (true, false) => "import",
                    (false, true) => "usage",
                    (false, false) => "none",
                };
                format!("{}: {}", c.name, found)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn classify(content: &str, patterns: &[ComponentPatterns]) -> Classification {
    Classification {
        components: patterns
            .iter()
            .map(|p| ComponentMatch {
                name: p.name.clone(),
                has_import: p.has_import(content),
                has_usage: p.has_usage(content),
            })
            .collect(),
    }
}

/// Check whether a path is on the exclusion list or is the layout file.
///
/// Exclusion entries match as trailing path components, so `app/layout.tsx`
/// excludes `./app/layout.tsx` and `/srv/site/app/layout.tsx` but not
/// `app/admin/layout.tsx.bak`.
pub fn is_excluded(path: &Path, config: &StripConfig) -> bool {
    let is_layout = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy() == config.layout_file.as_str());

    is_layout || config.exclude.iter().any(|entry| path.ends_with(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::compile_patterns;
    use std::path::PathBuf;

    fn targets() -> Vec<ComponentPatterns> {
        compile_patterns(&["Header".to_string(), "Footer".to_string()]).unwrap()
    }

    #[test]
    fn test_both_components_eligible() {
        let content = "import Header from './Header'\nimport Footer from './Footer'\n\
                       const P = () => <><Header /><main/><Footer /></>";
        let c = classify(content, &targets());
        assert!(c.is_eligible());
        assert_eq!(c.present(), vec!["Header", "Footer"]);
    }

    #[test]
    fn test_single_component_is_enough() {
        let content = "import Footer from \"./Footer\"\nexport default () => <Footer />";
        let c = classify(content, &targets());
        assert!(c.is_eligible());
        assert_eq!(c.present(), vec!["Footer"]);
    }

    #[test]
    fn test_import_without_usage_is_not_eligible() {
        let content = "import Header from './Header'\nexport default () => <div />";
        let c = classify(content, &targets());
        assert!(!c.is_eligible());
        assert_eq!(c.describe(), "Header: import, Footer: none");
    }

    #[test]
    fn test_usage_without_import_is_not_eligible() {
        let content = "export default () => <Header />";
        assert!(!classify(content, &targets()).is_eligible());
    }

    #[test]
    fn test_rewritten_file_is_not_eligible() {
        let content = "// Header import removed\nexport default () => <main>x</main>";
        assert!(!classify(content, &targets()).is_eligible());
    }

    #[test]
    fn test_layout_file_excluded_anywhere() {
        let config = StripConfig::defaults().unwrap();
        assert!(is_excluded(Path::new("app/layout.tsx"), &config));
        assert!(is_excluded(Path::new("app/admin/layout.tsx"), &config));
        assert!(!is_excluded(Path::new("app/admin/page.tsx"), &config));
        assert!(!is_excluded(Path::new("app/mylayout.tsx"), &config));
    }

    #[test]
    fn test_exclusion_entries_match_trailing_components() {
        let mut config = StripConfig::defaults().unwrap();
        config.exclude.push(PathBuf::from("shop/page.tsx"));
        assert!(is_excluded(Path::new("/srv/site/app/shop/page.tsx"), &config));
        assert!(!is_excluded(Path::new("app/workshop/page.tsx"), &config));
    }
}
