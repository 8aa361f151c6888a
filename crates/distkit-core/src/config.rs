use crate::error::Result;
use crate::paths;
use crate::step::{Invocation, Step, StepKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ToolConfig
// ---------------------------------------------------------------------------

/// An external tool backing one build step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub failure_message: String,
}

impl ToolConfig {
    fn new(program: &str, args: &[&str], failure_message: &str) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            failure_message: failure_message.to_string(),
        }
    }

    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.program.clone(), self.args.iter().cloned())
    }
}

const SOURCE_GLOB: &str = "{src,test}/**/*.{ts,tsx}";

fn default_style_check() -> ToolConfig {
    ToolConfig::new(
        "prettier",
        &["--config", "node/prettier.json", "--list-different", SOURCE_GLOB],
        "check code style failed, please format above files",
    )
}

fn default_test() -> ToolConfig {
    ToolConfig::new(
        "jest",
        &["--config", "node/jest.json", "--coverage"],
        "test failed, please fix",
    )
}

fn default_lint() -> ToolConfig {
    ToolConfig::new(
        "tslint",
        &["-c", "node/tslint.json", SOURCE_GLOB],
        "lint failed, please fix",
    )
}

fn default_compile() -> ToolConfig {
    ToolConfig::new(
        "tsc",
        &["-p", "node/tsconfig.json"],
        "compile failed, please fix",
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_style_check")]
    pub style_check: ToolConfig,
    #[serde(default = "default_test")]
    pub test: ToolConfig,
    #[serde(default = "default_lint")]
    pub lint: ToolConfig,
    #[serde(default = "default_compile")]
    pub compile: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            style_check: default_style_check(),
            test: default_test(),
            lint: default_lint(),
            compile: default_compile(),
        }
    }
}

impl ToolsConfig {
    fn entries(&self) -> [(StepKind, &ToolConfig); 4] {
        [
            (StepKind::StyleCheck, &self.style_check),
            (StepKind::Test, &self.test),
            (StepKind::Lint, &self.lint),
            (StepKind::Compile, &self.compile),
        ]
    }
}

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

/// Project-relative directories the pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Build root, emptied by cleanup.
    #[serde(default = "default_build")]
    pub build: PathBuf,
    /// Intermediate compiler output, removed after staging.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Compiled sources copied into `<dist>/lib`.
    #[serde(default = "default_compiled")]
    pub compiled: PathBuf,
    #[serde(default = "default_dist")]
    pub dist: PathBuf,
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default = "default_source")]
    pub source: PathBuf,
}

fn default_build() -> PathBuf {
    PathBuf::from(paths::BUILD_DIR)
}

fn default_output() -> PathBuf {
    PathBuf::from(paths::OUTPUT_DIR)
}

fn default_compiled() -> PathBuf {
    PathBuf::from(paths::COMPILED_DIR)
}

fn default_dist() -> PathBuf {
    PathBuf::from(paths::DIST_DIR)
}

fn default_manifest() -> PathBuf {
    PathBuf::from(paths::MANIFEST_FILE)
}

fn default_source() -> PathBuf {
    PathBuf::from(paths::SOURCE_DIR)
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            build: default_build(),
            output: default_output(),
            compiled: default_compiled(),
            dist: default_dist(),
            manifest: default_manifest(),
            source: default_source(),
        }
    }
}

impl LayoutConfig {
    fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("build", self.build.as_path()),
            ("output", self.output.as_path()),
            ("compiled", self.compiled.as_path()),
            ("dist", self.dist.as_path()),
            ("manifest", self.manifest.as_path()),
            ("source", self.source.as_path()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            tools: ToolsConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load `distkit.yaml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = self.to_yaml()?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The six build steps in execution order.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(StepKind::all().len());
        steps.push(Step::cleanup());
        for (kind, tool) in self.tools.entries() {
            steps.push(Step::exec(kind, tool.invocation(), tool.failure_message.clone()));
        }
        steps.push(Step::distribute());
        steps
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let error = |message: String| ConfigWarning {
            level: WarnLevel::Error,
            message,
        };

        // 1. Every tool needs a program
        for (kind, tool) in self.tools.entries() {
            if tool.program.trim().is_empty() {
                warnings.push(error(format!("tool '{}' has an empty program", kind)));
            }
        }

        // 2. Layout paths must stay inside the project root
        let mut escaping = false;
        for (name, path) in self.layout.entries() {
            if path.as_os_str().is_empty() || !paths::is_contained(path) {
                escaping = true;
                warnings.push(error(format!(
                    "layout.{} '{}' must be a relative path inside the project",
                    name,
                    path.display()
                )));
            }
        }
        if escaping {
            return warnings;
        }

        let layout = &self.layout;

        // 3. Cleanup must never target the project root itself
        if paths::normalize(&layout.build).as_os_str().is_empty() {
            warnings.push(error(format!(
                "layout.build '{}' resolves to the project root; cleanup would wipe the project",
                layout.build.display()
            )));
            return warnings;
        }

        // 4. Output and dist live under the build root
        for (name, path) in [("output", &layout.output), ("dist", &layout.dist)] {
            if !paths::is_strictly_inside(path, &layout.build) {
                warnings.push(error(format!(
                    "layout.{} '{}' must be inside layout.build '{}'",
                    name,
                    path.display(),
                    layout.build.display()
                )));
            }
        }

        // 5. Cleanup must not reach the inputs, and staging must not copy the
        //    build root into itself
        let build = paths::normalize(&layout.build);
        for (name, path) in [("source", &layout.source), ("manifest", &layout.manifest)] {
            if paths::normalize(path).starts_with(&build) {
                warnings.push(error(format!(
                    "layout.{} '{}' is inside layout.build '{}' and would be removed by cleanup",
                    name,
                    path.display(),
                    layout.build.display()
                )));
            }
        }
        if paths::is_strictly_inside(&layout.build, &layout.source)
            || paths::normalize(&layout.source).as_os_str().is_empty()
        {
            warnings.push(error(format!(
                "layout.build '{}' is inside layout.source '{}'; distribute would copy the build into itself",
                layout.build.display(),
                layout.source.display()
            )));
        }

        // 6. Dist inside output would be deleted after staging
        let out = paths::normalize(&layout.output);
        let dist = paths::normalize(&layout.dist);
        if dist.starts_with(&out) {
            warnings.push(error(format!(
                "layout.dist '{}' is inside layout.output '{}' and would be removed after staging",
                layout.dist.display(),
                layout.output.display()
            )));
        }

        // 7. Compiled output normally sits in the intermediate directory
        if !paths::normalize(&layout.compiled).starts_with(&out) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "layout.compiled '{}' is outside layout.output '{}' and will not be cleaned up",
                    layout.compiled.display(),
                    layout.output.display()
                ),
            });
        }

        warnings
    }

    /// Error-level validation messages, joined for reporting.
    pub fn blocking_errors(&self) -> Option<String> {
        let errors: Vec<String> = self
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect();
        if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
