//! Line-oriented block duplication.
//!
//! Genrules in the target project switch on the CPU with shell conditionals:
//!
//! ```text
//! elif [ "$(TARGET_CPU)" == "ios_sim_arm64" ]; then
//!     ARCH="arm64"
//!     HOST="aarch64-apple-darwin"
//! else
//! ```
//!
//! [`duplicate_block`] finds each such marker line, captures the body up to the
//! next branch keyword, and emits a copy for a new architecture right after it.
//! It works on raw lines and never parses shell or Starlark, so it only sees
//! what exact substring and prefix checks can see.

/// A literal find/replace pair applied to body lines of a duplicated block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub from: String,
    pub to: String,
}

impl TokenRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// An ordered list of [`TokenRule`]s.
///
/// Rules are applied one after another to the whole line, so a later rule
/// sees (and may rewrite) text produced by an earlier one.
///
/// ```
/// use archpatch_core::duplicate::TokenRules;
///
/// let rules = TokenRules::new()
///     .rule("aarch64", "x86_64")
///     .rule("arm64", "x86_64");
/// assert_eq!(rules.apply("--host=aarch64 -arch arm64"), "--host=x86_64 -arch x86_64");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRules {
    rules: Vec<TokenRule>,
}

impl TokenRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to the end of the list.
    pub fn rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rules.push(TokenRule::new(from, to));
        self
    }

    /// Applies every rule, in order, to `line`.
    pub fn apply(&self, line: &str) -> String {
        self.rules
            .iter()
            .fold(line.to_string(), |acc, rule| acc.replace(&rule.from, &rule.to))
    }
}

/// Output of [`duplicate_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplication {
    pub lines: Vec<String>,
    /// Number of marker blocks that were duplicated.
    pub blocks: usize,
}

impl Duplication {
    pub fn modified(&self) -> bool {
        self.blocks > 0
    }

    /// Joins the lines back with `\n`.
    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

/// Returns `true` for lines that end a shell conditional branch: `elif ...`,
/// `else...`, or a lone `fi`.
pub fn is_branch_end(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("elif ") || trimmed.starts_with("else") || trimmed == "fi"
}

/// Leading whitespace of `line`.
fn leading_indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Duplicates every block that starts at a marker line.
///
/// Each marker line and its body are copied through unchanged. Right after the
/// body, before the terminator line, a new block is inserted: `new_marker`
/// prefixed with the indentation of the first non-blank body line, followed
/// by every body line rewritten through `rules`. The terminator itself is not
/// consumed and may start another block. A body without a terminator runs to
/// the end of the input.
///
/// Input without a marker comes back unchanged with `blocks == 0`.
pub fn duplicate_block<S, M, T>(
    lines: &[S],
    is_marker: M,
    is_terminator: T,
    new_marker: &str,
    rules: &TokenRules,
) -> Duplication
where
    S: AsRef<str>,
    M: Fn(&str) -> bool,
    T: Fn(&str) -> bool,
{
    let mut out = Vec::with_capacity(lines.len());
    let mut blocks = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref();
        out.push(line.to_string());
        i += 1;

        if !is_marker(line) {
            continue;
        }

        let mut body: Vec<&str> = Vec::new();
        let mut indent = "";
        while i < lines.len() {
            let candidate = lines[i].as_ref();
            if is_terminator(candidate) {
                break;
            }
            if indent.is_empty() && !candidate.trim().is_empty() {
                indent = leading_indent(candidate);
            }
            body.push(candidate);
            out.push(candidate.to_string());
            i += 1;
        }

        out.push(format!("{indent}{new_marker}"));
        out.extend(body.iter().map(|line| rules.apply(line)));
        blocks += 1;
    }

    Duplication { lines: out, blocks }
}

/// A reusable marker/rules pairing for [`duplicate_block`].
///
/// The marker is matched as a substring of a line; the terminator is
/// [`is_branch_end`].
#[derive(Debug, Clone)]
pub struct BlockDuplicator {
    marker: String,
    new_marker: String,
    rules: TokenRules,
}

impl BlockDuplicator {
    /// Creates a duplicator for lines containing `marker`; copies are headed by
    /// `new_marker`.
    pub fn new(marker: impl Into<String>, new_marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            new_marker: new_marker.into(),
            rules: TokenRules::new(),
        }
    }

    /// Sets the rules applied to body lines of each copy.
    pub fn rules(mut self, rules: TokenRules) -> Self {
        self.rules = rules;
        self
    }

    /// Runs the duplication over `text`, split on `\n`.
    pub fn apply(&self, text: &str) -> Duplication {
        let lines: Vec<&str> = text.split('\n').collect();
        duplicate_block(
            &lines,
            |line| line.contains(&self.marker),
            is_branch_end,
            &self.new_marker,
            &self.rules,
        )
    }
}
