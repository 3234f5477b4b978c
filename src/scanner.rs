use crate::error::ContentReadError;
use crate::naming::SEPARATOR;
use crate::plugin::ClassExtractor;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Class names referenced by content, plus the prefixes of names that are
/// assembled at runtime (`"bg-" + shade`, `` `bg-${shade}` ``).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedClasses {
    classes: HashSet<String>,
    prefixes: BTreeSet<String>,
}

impl UsedClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_class(&mut self, class: impl Into<String>) {
        self.classes.insert(class.into());
    }

    pub fn insert_prefix(&mut self, prefix: impl Into<String>) {
        self.prefixes.insert(prefix.into());
    }

    pub fn extend(&mut self, other: UsedClasses) {
        self.classes.extend(other.classes);
        self.prefixes.extend(other.prefixes);
    }

    pub fn contains_exact(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn matches(&self, class: &str) -> bool {
        if self.classes.contains(class) {
            return true;
        }
        self.prefixes
            .iter()
            .any(|prefix| class.len() > prefix.len() && class.starts_with(prefix.as_str()))
    }

    pub fn sorted_classes(&self) -> Vec<String> {
        let mut classes = self.classes.iter().cloned().collect::<Vec<_>>();
        classes.sort();
        classes
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.prefixes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultExtractor;

impl ClassExtractor for DefaultExtractor {
    fn extract(&self, text: &str) -> UsedClasses {
        let mut used = UsedClasses::new();
        for token in class_tokens(text) {
            used.insert_class(token);
            for part in token.split(':').filter(|part| !part.is_empty()) {
                record_part(part, &mut used);
            }
        }
        used
    }
}

pub fn extract_classes(text: &str) -> Vec<String> {
    DefaultExtractor.extract(text).sorted_classes()
}

fn class_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !is_class_char(ch))
        .filter(|token| token.chars().any(|ch| ch.is_ascii_alphanumeric()))
}

fn is_class_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == ':' || ch == '-'
}

/// Longest `-` fragment recorded from a token; covers prefix, modifier,
/// tag, family and shade.
const MAX_FRAGMENT_SEGMENTS: usize = 6;

fn record_part(part: &str, used: &mut UsedClasses) {
    used.insert_class(part);

    let segments = part.split(SEPARATOR).collect::<Vec<_>>();
    let dynamic = part.ends_with(SEPARATOR);
    let last = segments.len() - 1;

    for start in 0..segments.len() {
        if segments[start].is_empty() {
            continue;
        }
        if dynamic && segments.len() - start <= MAX_FRAGMENT_SEGMENTS + 1 {
            let prefix = segments[start..].join(SEPARATOR);
            if prefix.len() > SEPARATOR.len() {
                used.insert_prefix(prefix);
            }
        }
        let window_end = (start + MAX_FRAGMENT_SEGMENTS).min(segments.len());
        for end in start..window_end {
            if segments[end].is_empty() {
                continue;
            }
            if start == 0 && end == last {
                continue;
            }
            used.insert_class(segments[start..=end].join(SEPARATOR));
        }
    }
}

pub trait ContentSource: Sync {
    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ContentReadError>;

    fn read_text(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGlobOptions {
    pub base_path: PathBuf,
    pub ignore: Vec<String>,
    pub respect_gitignore: bool,
    pub include_binary_files: bool,
    pub include_stylesheets: bool,
    pub include_lock_files: bool,
}

impl Default for ScanGlobOptions {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            ignore: Vec::new(),
            respect_gitignore: true,
            include_binary_files: false,
            include_stylesheets: false,
            include_lock_files: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FsContentSource {
    options: ScanGlobOptions,
}

impl FsContentSource {
    pub fn new(options: ScanGlobOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanGlobOptions {
        &self.options
    }
}

impl ContentSource for FsContentSource {
    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ContentReadError> {
        let to_error = |message: String| ContentReadError {
            path: PathBuf::from(pattern),
            message,
        };
        let globset = build_globset(&[pattern.to_string()]).map_err(to_error)?;
        let ignore_set = build_globset(&self.options.ignore).map_err(to_error)?;
        let base_path = &self.options.base_path;
        let mut paths = Vec::new();

        let mut builder = WalkBuilder::new(base_path);
        builder
            .hidden(false)
            .git_ignore(self.options.respect_gitignore)
            .git_global(self.options.respect_gitignore)
            .git_exclude(self.options.respect_gitignore)
            .sort_by_file_path(|left, right| left.cmp(right));
        let walker = builder.build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(pattern, error = %err, "skipping unreadable walk entry");
                    continue;
                }
            };
            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            let relative_path = path.strip_prefix(base_path).unwrap_or(path);
            if !globset.is_match(relative_path) && !globset.is_match(path) {
                continue;
            }
            if ignore_set.is_match(relative_path) || ignore_set.is_match(path) {
                continue;
            }
            if should_skip_file(path, &self.options) {
                continue;
            }
            paths.push(path.to_path_buf());
        }

        Ok(paths)
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Content held in memory, keyed by path. Globs match against the keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentSource {
    files: Vec<(PathBuf, Option<String>)>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.push((path.into(), Some(text.into())));
        self
    }

    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), None));
        self
    }
}

impl ContentSource for MemoryContentSource {
    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ContentReadError> {
        let globset = build_globset(&[pattern.to_string()]).map_err(|message| ContentReadError {
            path: PathBuf::from(pattern),
            message,
        })?;
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| globset.is_match(path))
            .map(|(path, _)| path.clone())
            .collect())
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        match self.files.iter().find(|(candidate, _)| candidate == path) {
            Some((_, Some(text))) => Ok(text.clone()),
            Some((_, None)) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "content is not readable",
            )),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such content")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub classes: Vec<String>,
    pub files_scanned: usize,
    pub failures: Vec<ContentReadError>,
}

pub fn expand_patterns<S: ContentSource + ?Sized>(
    source: &S,
    patterns: &[String],
) -> (Vec<PathBuf>, Vec<ContentReadError>) {
    let mut paths = Vec::new();
    let mut failures = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        match source.expand_glob(pattern) {
            Ok(expanded) => {
                for path in expanded {
                    if seen.insert(path.clone()) {
                        paths.push(path);
                    }
                }
            }
            Err(err) => failures.push(err),
        }
    }

    (paths, failures)
}

pub fn scan<S: ContentSource + ?Sized>(source: &S, patterns: &[String]) -> ScanResult {
    let (paths, mut failures) = expand_patterns(source, patterns);
    let mut used = UsedClasses::new();
    let mut files_scanned = 0;

    for path in &paths {
        match source.read_text(path) {
            Ok(text) => {
                files_scanned += 1;
                used.extend(DefaultExtractor.extract(&text));
            }
            Err(err) => failures.push(ContentReadError {
                path: path.clone(),
                message: err.to_string(),
            }),
        }
    }

    ScanResult {
        classes: used.sorted_classes(),
        files_scanned,
        failures,
    }
}

pub fn build_globset(patterns: &[String]) -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|err| format!("invalid glob pattern '{}': {}", pattern, err))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| format!("failed to build glob set: {}", err))
}

fn should_skip_file(path: &Path, options: &ScanGlobOptions) -> bool {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");
    if !options.include_lock_files && is_common_lock_file(file_name) {
        return true;
    }

    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase());
    if let Some(ext) = ext.as_deref() {
        if !options.include_stylesheets && is_stylesheet_extension(ext) {
            return true;
        }
        if !options.include_binary_files && is_binary_extension(ext) {
            return true;
        }
    }

    false
}

fn is_stylesheet_extension(ext: &str) -> bool {
    matches!(ext, "uss" | "tss" | "css")
}

fn is_binary_extension(ext: &str) -> bool {
    matches!(
        ext,
        "png"
            | "jpg"
            | "jpeg"
            | "gif"
            | "psd"
            | "tga"
            | "exr"
            | "hdr"
            | "fbx"
            | "obj"
            | "wav"
            | "mp3"
            | "ogg"
            | "mp4"
            | "asset"
            | "unity"
            | "prefab"
            | "meta"
            | "dll"
            | "zip"
            | "ttf"
            | "otf"
    )
}

fn is_common_lock_file(file_name: &str) -> bool {
    matches!(
        file_name,
        "packages-lock.json" | "package-lock.json" | "yarn.lock" | "Cargo.lock"
    )
}

#[cfg(test)]
mod tests {
    use super::{
        ContentSource, DefaultExtractor, FsContentSource, MemoryContentSource, ScanGlobOptions,
        extract_classes, scan,
    };
    use crate::plugin::ClassExtractor;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn extracts_from_class_attribute() {
        let classes = extract_classes(r#"<ui:VisualElement class="p-4 bg-red-500" />"#);
        assert!(classes.contains(&"p-4".to_string()));
        assert!(classes.contains(&"bg-red-500".to_string()));
    }

    #[test]
    fn extracts_quoted_and_operator_delimited_tokens() {
        let classes = extract_classes(
            r#"element.AddToClassList("text-white");var c=flag?"rounded":"rounded-lg";"#,
        );
        assert!(classes.contains(&"text-white".to_string()));
        assert!(classes.contains(&"rounded".to_string()));
        assert!(classes.contains(&"rounded-lg".to_string()));
    }

    #[test]
    fn over_matches_fragments_of_dash_joined_tokens() {
        let used = DefaultExtractor.extract("hover-bg-red-500");
        assert!(used.contains_exact("hover-bg-red-500"));
        assert!(used.contains_exact("bg-red-500"));
        assert!(used.contains_exact("red-500"));
        assert!(used.contains_exact("hover-bg"));
    }

    #[test]
    fn splits_modifier_style_tokens_on_colon() {
        let used = DefaultExtractor.extract(r#"class="hover:bg-blue-500""#);
        assert!(used.contains_exact("hover:bg-blue-500"));
        assert!(used.contains_exact("hover"));
        assert!(used.contains_exact("bg-blue-500"));
    }

    #[test]
    fn records_dynamic_prefixes() {
        let used = DefaultExtractor.extract(r#"var name = "bg-" + shade; var other = $"text-{size}";"#);
        assert!(used.matches("bg-red-500"));
        assert!(used.matches("text-lg"));
        assert!(!used.matches("rounded-lg"));
    }

    #[test]
    fn template_literal_interpolation_yields_prefix() {
        let used = DefaultExtractor.extract("const cls = `p-${size}`;");
        assert!(used.matches("p-4"));
        assert!(!used.matches("m-4"));
    }

    #[test]
    fn long_dash_runs_record_only_short_fragments() {
        let token = (0..1500)
            .map(|index| format!("s{}", index))
            .collect::<Vec<_>>()
            .join("-");
        let used = DefaultExtractor.extract(&token);

        assert!(used.contains_exact(&token));
        assert!(used.contains_exact("s10-s11-s12-s13-s14-s15"));
        assert!(!used.contains_exact("s10-s11-s12-s13-s14-s15-s16"));
        assert!(used.len() <= 1500 * 6 + 1);

        let dynamic = format!("{}-", token);
        let used = DefaultExtractor.extract(&dynamic);
        assert!(used.matches("s1499-x"));
        assert!(!used.matches("s0-s1-x"));
    }

    #[test]
    fn ignores_tokens_without_alphanumerics() {
        let used = DefaultExtractor.extract("a -- b ::: -");
        assert!(!used.contains_exact("--"));
        assert!(!used.contains_exact(":::"));
        assert!(used.prefixes().next().is_none());
    }

    #[test]
    fn memory_source_reports_unreadable_files() {
        let source = MemoryContentSource::new()
            .with_file("ui/main.uxml", r#"<Label class="text-lg" />"#)
            .with_unreadable("ui/locked.uxml");
        let result = scan(&source, &["ui/*.uxml".to_string()]);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, PathBuf::from("ui/locked.uxml"));
        assert!(result.classes.contains(&"text-lg".to_string()));
    }

    #[test]
    fn invalid_glob_is_reported_as_failure() {
        let source = MemoryContentSource::new();
        let result = scan(&source, &["ui/[".to_string()]);
        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.failures.len(), 1);
    }

    #[test]
    fn scans_glob_patterns_on_disk() {
        let base = temp_dir("usswind_scanner_glob");
        let _ = fs::create_dir_all(base.join("nested"));
        let _ = fs::write(base.join("nested/main.uxml"), r#"<Button class="p-2" />"#);
        let _ = fs::write(base.join("nested/generated.uss"), ".m-4 { margin: 16px; }");
        let _ = fs::write(base.join("nested/icon.png"), "not-an-image");

        let source = FsContentSource::new(ScanGlobOptions {
            base_path: base.clone(),
            ..ScanGlobOptions::default()
        });
        let paths = source
            .expand_glob("**/*")
            .expect("expand_glob should succeed");
        assert_eq!(paths.len(), 1);

        let result = scan(&source, &["**/*".to_string()]);
        assert!(result.classes.contains(&"p-2".to_string()));
        assert!(!result.classes.contains(&"m-4".to_string()));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn fs_source_honors_ignore_patterns() {
        let base = temp_dir("usswind_scanner_ignore");
        let _ = fs::create_dir_all(base.join("src"));
        let _ = fs::create_dir_all(base.join("generated"));
        let _ = fs::write(base.join("src/a.uxml"), r#"<Label class="text-sm" />"#);
        let _ = fs::write(base.join("generated/b.uxml"), r#"<Label class="underline" />"#);

        let source = FsContentSource::new(ScanGlobOptions {
            base_path: base.clone(),
            ignore: vec!["generated/**".to_string()],
            ..ScanGlobOptions::default()
        });
        let result = scan(&source, &["**/*.uxml".to_string()]);
        assert!(result.classes.contains(&"text-sm".to_string()));
        assert!(!result.classes.contains(&"underline".to_string()));

        let _ = fs::remove_dir_all(&base);
    }

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}", prefix, nanos))
    }
}
