use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::paths;
use crate::rules::{Category, RuleTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestDetection {
    /// Common test folder and file names are excluded.
    Heuristic,
    /// Only this project-rooted directory (e.g. `proj/test`) is excluded.
    Explicit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude(Category),
}

impl Verdict {
    pub fn is_included(self) -> bool {
        self == Verdict::Include
    }
}

/// Per-run record of which categories fired, and how often.
#[derive(Debug, Default)]
pub struct Diagnostics {
    hits: BTreeMap<Category, usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time `category` is recorded.
    pub fn record(&mut self, category: Category) -> bool {
        let count = self.hits.entry(category).or_insert(0);
        *count += 1;
        *count == 1
    }

    pub fn count(&self, category: Category) -> usize {
        self.hits.get(&category).copied().unwrap_or(0)
    }

    /// Categories that fired, in rule-table order.
    pub fn breakdown(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.count(category)))
            .filter(|&(_, n)| n > 0)
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
    tests: TestDetection,
}

impl Classifier {
    pub fn new(rules: RuleTable, tests: TestDetection) -> Self {
        Self { rules, tests }
    }

    /// Decides whether the archive-relative `name` belongs in the archive.
    ///
    /// The first segment of `name` is the project folder and is never matched
    /// against the rules. A trailing `/` is ignored. The first exclusion of
    /// each category is logged; later ones are only counted.
    pub fn classify(&self, name: &str, diagnostics: &mut Diagnostics) -> Verdict {
        let verdict = self.verdict(name);
        if let Verdict::Exclude(category) = verdict {
            if diagnostics.record(category) {
                log::info!("\t{}", self.message(category));
            }
            log::trace!("excluded ({category}): {name}");
        }
        verdict
    }

    /// Log line for the first exclusion of `category`.
    pub fn message(&self, category: Category) -> Cow<'static, str> {
        match (&self.tests, category) {
            (TestDetection::Explicit(dir), Category::Tests) => {
                Cow::Owned(format!("Ignoring the entire content of the `{dir}` folder"))
            }
            _ => Cow::Borrowed(category.message()),
        }
    }

    fn verdict(&self, name: &str) -> Verdict {
        let segments = paths::segments(name);
        let Some((_, below_root)) = segments.split_first() else {
            return Verdict::Include;
        };

        if let TestDetection::Explicit(test_dir) = &self.tests {
            let test_segments = paths::segments(test_dir);
            if segments.starts_with(&test_segments) {
                return Verdict::Exclude(Category::Tests);
            }
        }

        if below_root.is_empty() {
            return Verdict::Include;
        }

        let heuristic = self.tests == TestDetection::Heuristic;
        self.rules
            .rules()
            .iter()
            .filter(|rule| heuristic || !rule.category.is_test_heuristic())
            .find(|rule| rule.matcher.matches(below_root))
            .map_or(Verdict::Include, |rule| Verdict::Exclude(rule.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn heuristic() -> Classifier {
        Classifier::new(RuleTable::builtin(), TestDetection::Heuristic)
    }

    fn explicit(dir: &str) -> Classifier {
        Classifier::new(RuleTable::builtin(), TestDetection::Explicit(dir.to_string()))
    }

    fn included(classifier: &Classifier, name: &str) -> bool {
        classifier.classify(name, &mut Diagnostics::new()).is_included()
    }

    #[test]
    fn plain_source_is_included() {
        let c = heuristic();

        assert!(included(&c, "proj"));
        assert!(included(&c, "proj/"));
        assert!(included(&c, "proj/app.js"));
        assert!(included(&c, "proj/package.json"));
        assert!(included(&c, "proj/package-lock.json"));
        assert!(included(&c, "proj/styles/blub.css2"));
        assert!(included(&c, "proj/bower_components/bower.json"));
    }

    #[test]
    fn excluded_extensions() {
        let c = heuristic();

        for name in [
            "proj/a.css",
            "proj/a.jpg",
            "proj/a.pdf",
            "proj/a.woff",
            "proj/a.mp4",
            "proj/a.sqlite3",
        ] {
            assert!(!included(&c, name), "{name} should be excluded");
        }
    }

    #[test]
    fn excluded_folders_at_any_depth() {
        let c = heuristic();

        for folder in ["node_modules", ".git", "build", "dist", "public", ".vscode", ".idea"] {
            assert!(!included(&c, &format!("proj/{folder}")));
            assert!(!included(&c, &format!("proj/{folder}/")));
            assert!(!included(&c, &format!("proj/src/{folder}/index.js")));
        }
    }

    #[test]
    fn folder_rules_do_not_match_substrings() {
        let c = heuristic();

        assert!(included(&c, "proj/building/something.js"));
        assert!(included(&c, "proj/distance/should-be-included.js"));
        assert!(included(&c, "proj/build-tools/run.js"));
        assert!(included(&c, "proj/testimonials-no-tests/should-be-included.js"));
        assert!(included(&c, "proj/.github/workflows/ci.yml"));
    }

    #[test]
    fn project_named_like_a_rule_is_not_excluded() {
        let c = heuristic();

        assert!(included(&c, "build"));
        assert!(included(&c, "build/app.js"));
        assert!(included(&c, "test/src/index.js"));
        assert!(!included(&c, "test/test/index.js"));
    }

    #[test]
    fn heuristic_mode_excludes_common_tests() {
        let c = heuristic();

        assert!(!included(&c, "proj/test"));
        assert!(!included(&c, "proj/test/app.test.js"));
        assert!(!included(&c, "proj/e2e/app.po.ts"));
        assert!(!included(&c, "proj/src/__tests__/a.js"));
        assert!(!included(&c, "proj/src/app/thing.spec.ts"));
        assert!(!included(&c, "proj/src/Widget.test.tsx"));
    }

    #[test]
    fn explicit_mode_excludes_only_the_given_folder() {
        let c = explicit("proj/test");

        assert!(!included(&c, "proj/test"));
        assert!(!included(&c, "proj/test/"));
        assert!(!included(&c, "proj/test/unit/a.js"));
        assert!(included(&c, "proj/e2e/app.po.ts"));
        assert!(included(&c, "proj/src/test/a.js"));
        assert!(included(&c, "proj/src/app/thing.spec.ts"));
        assert!(included(&c, "proj/testing/a.js"));
    }

    #[test]
    fn explicit_mode_keeps_other_rules() {
        let c = explicit("proj/test");

        assert!(!included(&c, "proj/node_modules/x.js"));
        assert!(!included(&c, "proj/src/a.css"));
    }

    #[test]
    fn explicit_nested_test_folder() {
        let c = explicit("proj/src/specs");

        assert!(!included(&c, "proj/src/specs/a.js"));
        assert!(included(&c, "proj/src/app.js"));
        assert!(included(&c, "proj/specs/a.js"));
    }

    #[test]
    fn verdict_names_first_matching_category() {
        let c = heuristic();
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            c.classify("proj/node_modules/x/logo.png", &mut diagnostics),
            Verdict::Exclude(Category::NodeModules)
        );
        assert_eq!(
            c.classify("proj/assets/logo.png", &mut diagnostics),
            Verdict::Exclude(Category::Images)
        );
    }

    #[test]
    fn test_folder_message_names_the_folder() {
        let c = explicit("proj/src/specs");

        assert_eq!(
            c.message(Category::Tests),
            "Ignoring the entire content of the `proj/src/specs` folder"
        );
        assert_eq!(c.message(Category::Images), Category::Images.message());
    }

    #[test]
    fn diagnostics_fire_once_per_category() {
        let mut diagnostics = Diagnostics::new();

        assert!(diagnostics.record(Category::Images));
        assert!(!diagnostics.record(Category::Images));
        assert!(!diagnostics.record(Category::Images));
        assert!(diagnostics.record(Category::Fonts));
        assert_eq!(diagnostics.count(Category::Images), 3);
        assert_eq!(diagnostics.count(Category::Videos), 0);
    }

    #[test]
    fn deduplication_does_not_suppress_classification() {
        let c = heuristic();
        let mut diagnostics = Diagnostics::new();

        for i in 0..5 {
            let name = format!("proj/img/{i}.png");
            assert_eq!(c.classify(&name, &mut diagnostics), Verdict::Exclude(Category::Images));
        }
        assert_eq!(diagnostics.count(Category::Images), 5);
    }

    #[test]
    fn breakdown_follows_category_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(Category::Misc);
        diagnostics.record(Category::NodeModules);
        diagnostics.record(Category::NodeModules);

        let breakdown: Vec<_> = diagnostics.breakdown().collect();

        assert_eq!(
            breakdown,
            vec![(Category::NodeModules, 2), (Category::Misc, 1)]
        );
    }

    #[test]
    fn classification_is_total() {
        let c = heuristic();
        let mut diagnostics = Diagnostics::new();

        for name in ["", "/", "//", "proj//", "proj/./x", "\\weird\\name"] {
            let _ = c.classify(name, &mut diagnostics);
        }
    }

    proptest! {
        #[test]
        fn anything_under_excluded_folder_is_excluded(
            folder in prop::sample::select(vec![
                "node_modules", ".git", "build", "dist", "public", ".vscode", ".idea",
            ]),
            above in prop::collection::vec("[a-z]{1,8}", 0..3),
            below in prop::collection::vec("[a-z]{1,8}(\\.js)?", 0..3),
        ) {
            let mut parts = vec!["proj".to_string()];
            parts.extend(above);
            parts.push(folder.to_string());
            parts.extend(below);
            let name = parts.join("/");

            prop_assert!(!included(&heuristic(), &name));
        }

        #[test]
        fn trailing_slash_never_changes_verdict(name in "proj(/[a-zA-Z0-9_.-]{1,10}){0,4}") {
            let c = heuristic();
            let mut diagnostics = Diagnostics::new();

            prop_assert_eq!(
                c.classify(&name, &mut diagnostics),
                c.classify(&format!("{name}/"), &mut diagnostics)
            );
        }
    }
}
