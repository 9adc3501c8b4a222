use shellstrip::{classify, compile_patterns, is_excluded, StripConfig};
use std::path::Path;

fn targets() -> Vec<shellstrip::ComponentPatterns> {
    compile_patterns(&["Header".to_string(), "Footer".to_string()])
        .expect("Failed to compile component patterns for test")
}

#[test]
fn test_is_eligible() {
    let patterns = targets();

    assert!(
        classify(
            "import Header from '@/components/Header'\nexport default () => <Header />\n",
            &patterns
        )
        .is_eligible(),
        "imported and self-closing Header should be eligible"
    );
    assert!(
        classify(
            "import Footer from \"../Footer\";\nconst P = () => <Footer year={2024}>x</Footer>\n",
            &patterns
        )
        .is_eligible(),
        "imported and paired Footer should be eligible"
    );
    assert!(
        classify(
            "import Header from './Header'\nimport Footer from './Footer'\n<Footer\n  sticky\n/>\n",
            &patterns
        )
        .is_eligible(),
        "one rendered component is enough"
    );
}

#[test]
fn test_is_not_eligible() {
    let patterns = targets();

    assert!(
        !classify("import Header from './Header'\nexport const x = 1\n", &patterns).is_eligible(),
        "import without usage should not be eligible"
    );
    assert!(
        !classify("export default () => <Header />\n", &patterns).is_eligible(),
        "usage without import should not be eligible"
    );
    assert!(
        !classify(
            "import Header from './Header'\nexport default () => <Footer />\n",
            &patterns
        )
        .is_eligible(),
        "import and usage of different components should not be eligible"
    );
    assert!(
        !classify(
            "import HeaderBar from './HeaderBar'\nexport default () => <HeaderBar />\n",
            &patterns
        )
        .is_eligible(),
        "similarly named components should not be eligible"
    );
    assert!(
        !classify("import { Header } from './ui'\n<Header />\n", &patterns).is_eligible(),
        "named imports are left alone"
    );
}

#[test]
fn test_present_components() {
    let patterns = targets();
    let classification = classify(
        "import Header from './Header'\nimport Footer from './Footer'\n<Header/>\n",
        &patterns,
    );

    assert_eq!(classification.present(), vec!["Header"]);
    assert_eq!(
        classification.describe(),
        "Header: import+usage, Footer: import"
    );
}

#[test]
fn test_is_excluded() {
    let config = StripConfig::defaults().expect("Failed to load default configuration for test");

    assert!(
        is_excluded(Path::new("app/layout.tsx"), &config),
        "the root layout should be excluded"
    );
    assert!(
        is_excluded(Path::new("/srv/site/app/layout.tsx"), &config),
        "exclusions match the end of absolute paths"
    );
    assert!(
        is_excluded(Path::new("app/dashboard/layout.tsx"), &config),
        "nested layout files should be excluded by name"
    );
    assert!(!is_excluded(Path::new("app/page.tsx"), &config));
    assert!(!is_excluded(Path::new("app/mylayout.tsx"), &config));
}
