use std::fmt;

/// Why a path was left out of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    NodeModules,
    Tests,
    CommonTestFolders,
    CommonTestFiles,
    Stylesheets,
    Images,
    Documents,
    Fonts,
    Videos,
    Databases,
    BuildOutput,
    VersionControl,
    Ide,
    Misc,
    Custom,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::NodeModules,
        Category::Tests,
        Category::CommonTestFolders,
        Category::CommonTestFiles,
        Category::Stylesheets,
        Category::Images,
        Category::Documents,
        Category::Fonts,
        Category::Videos,
        Category::Databases,
        Category::BuildOutput,
        Category::VersionControl,
        Category::Ide,
        Category::Misc,
        Category::Custom,
    ];

    /// Heuristic test rules only apply when no explicit test directory is set.
    pub fn is_test_heuristic(self) -> bool {
        matches!(self, Category::CommonTestFolders | Category::CommonTestFiles)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::NodeModules => "node_modules",
            Category::Tests => "tests",
            Category::CommonTestFolders => "test folders",
            Category::CommonTestFiles => "test files",
            Category::Stylesheets => "stylesheets",
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Fonts => "fonts",
            Category::Videos => "videos",
            Category::Databases => "databases",
            Category::BuildOutput => "build output",
            Category::VersionControl => "version control",
            Category::Ide => "IDE metadata",
            Category::Misc => "misc",
            Category::Custom => "configured",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Category::NodeModules => "Ignoring the entire `node_modules` folder",
            Category::Tests => "Ignoring the entire content of the test folder",
            Category::CommonTestFolders => "Ignoring common test folders (such as `e2e`)",
            Category::CommonTestFiles => "Ignoring common test files (such as `.spec.ts`)",
            Category::Stylesheets => "Ignoring style sheets (such as `.css`)",
            Category::Images => "Ignoring images (such as `.jpg`)",
            Category::Documents => "Ignoring documents (such as `.pdf`, `.docx`)",
            Category::Fonts => "Ignoring fonts (such as `.woff`)",
            Category::Videos => "Ignoring videos (such as `.mp4`)",
            Category::Databases => "Ignoring databases (such as `.sqlite3`)",
            Category::BuildOutput => "Ignoring build output folders (`build`, `dist`, `public`)",
            Category::VersionControl => "Ignoring `.git`",
            Category::Ide => "Ignoring IDE folders (such as `.vscode`, `.idea`)",
            Category::Misc => "Ignoring tooling and metadata files (such as `.DS_Store`, `LICENSE`)",
            Category::Custom => "Ignoring paths excluded by the configuration file",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const NODE_MODULES: &[&str] = &["node_modules"];

const TEST_FOLDERS: &[&str] = &["test", "tests", "e2e", "__tests__"];

const TEST_FILES: &[&str] = &[".spec.ts", ".test.tsx", ".spec.js"];

const STYLESHEETS: &[&str] = &[".css", ".scss"];

const IMAGES: &[&str] = &[
    ".jpg", ".png", ".jpeg", ".gif", ".svg", ".bmp", ".ico", ".icns",
];

const DOCUMENTS: &[&str] = &[
    ".pdf", ".md",
    // Word
    ".doc", ".dot", ".wbk", ".docx", ".docm", ".dotx", ".dotm", ".docb", ".wll", ".wwl",
    // Excel
    ".xls", ".xlt", ".xlm", ".xll_", ".xla_", ".xla5", ".xla8", ".xlsx", ".xlsm", ".xltx", ".xltm",
    // PowerPoint
    ".ppt", ".pot", ".pps", ".pptx", ".pptm", ".potx", ".potm",
    // OneNote, Outlook, Access
    ".one", ".ecf", ".accda", ".accdb", ".accde", ".accdt", ".mda", ".mde",
];

const FONTS: &[&str] = &[".ttf", ".otf", ".woff", ".woff2"];

const VIDEOS: &[&str] = &[
    ".mp4", ".webm", ".mkv", ".flv", ".vob", ".ogv", ".drc", ".gifv", ".mng", ".avi", ".mov",
    ".qt", ".mts", ".wmv", ".amv", ".svi", ".m4v", ".mpg",
];

const DATABASES: &[&str] = &[".db", ".db3", ".sdb", ".sqlite", ".sqlite2", ".sqlite3"];

pub const DIST: &str = "dist";

pub const PUBLIC: &str = "public";

const BUILD_OUTPUT: &[&str] = &["build", DIST, PUBLIC];

pub const VERSION_CONTROL: &[&str] = &[".git"];

const IDE: &[&str] = &[".vscode", ".idea"];

const MISC: &[&str] = &[
    ".DS_Store",
    "__MACOSX",
    ".gitignore",
    ".gitkeep",
    ".gitattributes",
    ".npmignore",
    "CNAME",
    "tsconfig.json",
    "tslint.json",
    "karma.conf.js",
    "angular.json",
    ".travis.yml",
    ".browserslistrc",
    ".editorconfig",
    ".d.ts",
    "protractor.conf.js",
    ".spec.json",
    "tsconfig.app.json",
    "polyfills.ts",
    "LICENSE",
    "LICENSE.md",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Any segment equals one of the names.
    Segment(Vec<String>),
    /// The last segment ends with one of the suffixes, ignoring ASCII case.
    Extension(Vec<String>),
    /// The last segment ends with one of the suffixes, case-sensitive.
    NameSuffix(Vec<String>),
}

impl Matcher {
    fn segment(names: &[&str]) -> Self {
        Matcher::Segment(names.iter().map(ToString::to_string).collect())
    }

    fn extension(suffixes: &[&str]) -> Self {
        Matcher::Extension(suffixes.iter().map(|s| s.to_ascii_lowercase()).collect())
    }

    fn name_suffix(suffixes: &[&str]) -> Self {
        Matcher::NameSuffix(suffixes.iter().map(ToString::to_string).collect())
    }

    /// `segments` are the path segments below the project root.
    pub fn matches(&self, segments: &[&str]) -> bool {
        match self {
            Matcher::Segment(names) => segments
                .iter()
                .any(|segment| names.iter().any(|name| name == segment)),
            Matcher::Extension(suffixes) => segments.last().is_some_and(|last| {
                let last = last.to_ascii_lowercase();
                suffixes.iter().any(|suffix| last.ends_with(suffix.as_str()))
            }),
            Matcher::NameSuffix(suffixes) => segments
                .last()
                .is_some_and(|last| suffixes.iter().any(|suffix| last.ends_with(suffix.as_str()))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub category: Category,
    pub matcher: Matcher,
}

impl Rule {
    pub fn new(category: Category, matcher: Matcher) -> Self {
        Self { category, matcher }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn builtin() -> Self {
        let rules = vec![
            Rule::new(Category::NodeModules, Matcher::segment(NODE_MODULES)),
            Rule::new(Category::CommonTestFolders, Matcher::segment(TEST_FOLDERS)),
            Rule::new(Category::CommonTestFiles, Matcher::name_suffix(TEST_FILES)),
            Rule::new(Category::Stylesheets, Matcher::extension(STYLESHEETS)),
            Rule::new(Category::Images, Matcher::extension(IMAGES)),
            Rule::new(Category::Documents, Matcher::extension(DOCUMENTS)),
            Rule::new(Category::Fonts, Matcher::extension(FONTS)),
            Rule::new(Category::Videos, Matcher::extension(VIDEOS)),
            Rule::new(Category::Databases, Matcher::extension(DATABASES)),
            Rule::new(Category::BuildOutput, Matcher::segment(BUILD_OUTPUT)),
            Rule::new(Category::VersionControl, Matcher::segment(VERSION_CONTROL)),
            Rule::new(Category::Ide, Matcher::segment(IDE)),
            Rule::new(Category::Misc, Matcher::name_suffix(MISC)),
        ];
        Self { rules }
    }

    /// Built-in rules plus folder names and suffixes from the configuration file.
    pub fn with_extras(folders: &[String], extensions: &[String]) -> Self {
        let mut table = Self::builtin();
        if !folders.is_empty() {
            table
                .rules
                .push(Rule::new(Category::Custom, Matcher::Segment(folders.to_vec())));
        }
        if !extensions.is_empty() {
            let suffixes = extensions
                .iter()
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    if ext.starts_with('.') { ext } else { format!(".{ext}") }
                })
                .collect();
            table
                .rules
                .push(Rule::new(Category::Custom, Matcher::Extension(suffixes)));
        }
        table
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
