//! Command composition.
//!
//! A [`CommandLine`] keeps the compiler invocation as an ordered list of
//! typed segments. It is only flattened into a single string at the process
//! boundary (shell execution, banner output), or split into argument tokens
//! for direct spawning.

use std::fmt;

use crate::core::BuildConfig;

/// What a command segment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Compiler driver plus global flags
    Compiler,
    /// Preprocessor defines
    Defines,
    /// One source pattern
    Source,
    /// The literal `-o`
    OutputFlag,
    /// Output executable name
    Output,
    /// Include path flags
    Includes,
    /// Library link flags
    Libraries,
}

/// One piece of a composed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Segment {
            kind,
            text: text.into(),
        }
    }
}

/// A fully composed compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    segments: Vec<Segment>,
}

/// Compose the compiler invocation for a build config.
///
/// Order is fixed: compiler, defines, sources, `-o <output>`, includes,
/// libraries. Flag contents are not validated.
pub fn compose(config: &BuildConfig) -> CommandLine {
    let profile = &config.profile;

    let mut segments = Vec::with_capacity(config.source_patterns.len() + 6);
    segments.push(Segment::new(SegmentKind::Compiler, &config.compiler));
    segments.push(Segment::new(SegmentKind::Defines, &profile.define_flags));
    segments.extend(
        config
            .source_patterns
            .iter()
            .map(|pattern| Segment::new(SegmentKind::Source, pattern)),
    );
    segments.push(Segment::new(SegmentKind::OutputFlag, "-o"));
    segments.push(Segment::new(SegmentKind::Output, &profile.output_name));
    segments.push(Segment::new(SegmentKind::Includes, &profile.include_flags));
    segments.push(Segment::new(SegmentKind::Libraries, &profile.library_flags));

    CommandLine { segments }
}

impl CommandLine {
    /// The ordered segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Text of the first segment of the given kind, or `""`.
    fn text_of(&self, kind: SegmentKind) -> &str {
        self.segments
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.text.as_str())
            .unwrap_or("")
    }

    /// Source patterns in order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Source)
            .map(|s| s.text.as_str())
    }

    /// The program that will be run, if the compiler segment names one.
    pub fn program(&self) -> Option<&str> {
        self.text_of(SegmentKind::Compiler).split_whitespace().next()
    }

    /// Split into argument tokens for direct execution.
    ///
    /// Each segment is split on whitespace; empty fields contribute nothing.
    /// No quoting is interpreted.
    pub fn argv(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|s| s.text.split_whitespace())
            .map(str::to_string)
            .collect()
    }

    /// Like [`argv`](Self::argv), but with source patterns expanded against
    /// the filesystem.
    ///
    /// A pattern that matches nothing, or fails to parse, is passed through
    /// unchanged so the compiler reports the missing file itself.
    pub fn expanded_argv(&self) -> Vec<String> {
        let mut argv = Vec::new();
        for segment in &self.segments {
            for token in segment.text.split_whitespace() {
                if segment.kind == SegmentKind::Source {
                    argv.extend(expand_pattern(token));
                } else {
                    argv.push(token.to_string());
                }
            }
        }
        argv
    }
}

fn expand_pattern(pattern: &str) -> Vec<String> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!("invalid source pattern `{}`: {}", pattern, e);
            return vec![pattern.to_string()];
        }
    };

    let matches: Vec<String> = paths
        .filter_map(|entry| entry.ok())
        .map(|path| path.to_string_lossy().into_owned())
        .collect();

    if matches.is_empty() {
        tracing::debug!("source pattern `{}` matched no files", pattern);
        vec![pattern.to_string()]
    } else {
        matches
    }
}

impl fmt::Display for CommandLine {
    /// Render as a single command string.
    ///
    /// Separators are fixed: empty fields keep theirs, and two spaces
    /// precede the include flags.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<&str> = self.sources().collect();
        write!(
            f,
            "{} {} {} {} {}  {} {}",
            self.text_of(SegmentKind::Compiler),
            self.text_of(SegmentKind::Defines),
            sources.join(" "),
            self.text_of(SegmentKind::OutputFlag),
            self.text_of(SegmentKind::Output),
            self.text_of(SegmentKind::Includes),
            self.text_of(SegmentKind::Libraries),
        )
    }
}
