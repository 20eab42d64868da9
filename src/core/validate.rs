//! Validation of header annotations against extracted references.
//!
//! Four checks run in a fixed order and the first failure wins:
//!
//! 1. every internal reference is cited with `@see`, below the component block
//! 2. every component reference has a `@ref` / `@note` / `@see` triplet whose
//!    `@see` points at the Puppet forge
//! 3. every feature reference is cited with `@see`, below the internal block
//! 4. citations are sorted within each category
//!
//! All index arithmetic is done on the filtered annotation list.

use regex::Regex;
use thiserror::Error;

use crate::core::comments::Annotation;
use crate::core::extract::{Reference, ReferenceKind, ReferencePolicy};
use crate::core::token::Token;

/// Substring every component's provenance `@see` must contain.
pub const DEFAULT_FORGE_URL: &str = "https://forge.puppet.com/";

/// The check that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    InternalReferences,
    ComponentReferences,
    FeatureReferences,
    Order,
}

/// The first problem found in a declaration's header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Module {name} not referenced in the comments")]
    UnreferencedModule { name: String, origin: Token },

    #[error("Feature {name} not referenced in the comments")]
    UnreferencedFeature { name: String, origin: Token },

    #[error("Reference to {name} was found higher than {boundary}")]
    CitedTooHigh {
        kind: ReferenceKind,
        name: String,
        boundary: String,
    },

    #[error("Can't find @ref tag for reference {name}")]
    MissingRef { name: String },

    #[error("Missing @note tag for reference {name}")]
    MissingNote { name: String },

    #[error("Missing @see tag for reference {name}")]
    MissingSee { name: String },

    #[error("First @see for reference {name} is not the Puppet forge")]
    NotForge { name: String },

    #[error("{name} sorted after {anchor}")]
    Unsorted { name: String, anchor: String },
}

impl Violation {
    pub fn check(&self) -> Check {
        match self {
            Violation::UnreferencedModule { .. } => Check::InternalReferences,
            Violation::UnreferencedFeature { .. } => Check::FeatureReferences,
            Violation::CitedTooHigh { kind, .. } => match kind {
                ReferenceKind::Feature => Check::FeatureReferences,
                _ => Check::InternalReferences,
            },
            Violation::MissingRef { .. }
            | Violation::MissingNote { .. }
            | Violation::MissingSee { .. }
            | Violation::NotForge { .. } => Check::ComponentReferences,
            Violation::Unsorted { .. } => Check::Order,
        }
    }

    /// Line and column to report. Violations without a token of their own are
    /// reported at the top of the file.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Violation::UnreferencedModule { origin, .. }
            | Violation::UnreferencedFeature { origin, .. } => (origin.line, origin.column),
            _ => (1, 1),
        }
    }
}

fn is_url(text: &str) -> bool {
    text.contains("http://") || text.contains("https://")
}

/// Whether any comma-separated `@ref` pattern matches the name.
///
/// Patterns are unanchored regular expressions. A pattern that is not a valid
/// expression is compared as a literal substring instead.
fn matches_patterns(patterns: &str, name: &str) -> bool {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| match Regex::new(pattern) {
            Ok(regex) => regex.is_match(name),
            Err(err) => {
                tracing::debug!(pattern, error = %err, "invalid @ref pattern, matching literally");
                name.contains(pattern)
            }
        })
}

/// Checks annotation lines against the references of one declaration.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationValidator<'a> {
    policy: &'a ReferencePolicy,
    forge_url: &'a str,
}

impl<'a> AnnotationValidator<'a> {
    pub fn new(policy: &'a ReferencePolicy, forge_url: &'a str) -> Self {
        Self { policy, forge_url }
    }

    /// Run all checks, returning the first violation.
    pub fn validate(&self, references: &[Reference], lines: &[String]) -> Result<(), Violation> {
        let header = Header::new(lines);

        self.check_internal_references(references, &header)?;
        self.check_component_references(references, &header)?;
        self.check_feature_references(references, &header)?;
        self.check_order(references, &header)
    }

    fn check_internal_references(
        &self,
        references: &[Reference],
        header: &Header<'_>,
    ) -> Result<(), Violation> {
        let internal: Vec<&Reference> = of_kind(references, ReferenceKind::Internal).collect();

        for reference in &internal {
            if header.first_citation(&reference.name).is_none() {
                return Err(Violation::UnreferencedModule {
                    name: reference.name.clone(),
                    origin: reference.origin.clone(),
                });
            }
        }

        let boundary = self.first_citation_of(ReferenceKind::Component, references, header);
        check_citations_below(&internal, header, boundary)
    }

    fn check_component_references(
        &self,
        references: &[Reference],
        header: &Header<'_>,
    ) -> Result<(), Violation> {
        for reference in of_kind(references, ReferenceKind::Component) {
            let name = &reference.name;
            let Some(index) = header.find_ref(name) else {
                return Err(Violation::MissingRef { name: name.clone() });
            };
            if !header.line_has_tag(index + 1, "@note") {
                return Err(Violation::MissingNote { name: name.clone() });
            }
            if !header.line_has_tag(index + 2, "@see") {
                return Err(Violation::MissingSee { name: name.clone() });
            }
            if !header.lines[index + 2].contains(self.forge_url) {
                return Err(Violation::NotForge { name: name.clone() });
            }
        }
        Ok(())
    }

    fn check_feature_references(
        &self,
        references: &[Reference],
        header: &Header<'_>,
    ) -> Result<(), Violation> {
        let features: Vec<&Reference> = of_kind(references, ReferenceKind::Feature).collect();

        for reference in &features {
            if header.first_citation(&reference.name).is_none() {
                return Err(Violation::UnreferencedFeature {
                    name: reference.name.clone(),
                    origin: reference.origin.clone(),
                });
            }
        }

        let boundary = self.first_citation_of(ReferenceKind::Internal, references, header);
        check_citations_below(&features, header, boundary)
    }

    /// Citations must be sorted within each run of the same category. Each
    /// run is compared against its first name.
    ///
    /// A `@ref` block that documents no component has no category, so it ends
    /// the run around it.
    fn check_order(&self, references: &[Reference], header: &Header<'_>) -> Result<(), Violation> {
        let mut current = Some(ReferenceKind::Component);
        let mut anchor: Option<&str> = None;

        for index in 0..header.lines.len() {
            let Some((name, kind)) = self.relevant_name(references, header, index) else {
                continue;
            };
            if is_url(name) {
                continue;
            }

            if kind != current {
                anchor = None;
                current = kind;
            }
            let first = *anchor.get_or_insert(name);
            if first > name {
                return Err(Violation::Unsorted {
                    name: name.to_string(),
                    anchor: first.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The name a `@see` or `@ref` line sorts by, with its category.
    ///
    /// A plain `@see` sorts by its target. A `@ref` (and the provenance `@see`
    /// that follows a `@note`) sorts by the `@note` text of the component
    /// it documents. When it documents none, it sorts by its own payload and
    /// has no category.
    fn relevant_name<'h>(
        &self,
        references: &[Reference],
        header: &Header<'h>,
        index: usize,
    ) -> Option<(&'h str, Option<ReferenceKind>)> {
        let annotation = header.annotations[index]?;
        let word = annotation.leading_word()?;

        if matches!(annotation, Annotation::See { .. }) && !header.line_has_tag_before(index, "@note")
        {
            if is_url(word) {
                return None;
            }
            return references
                .iter()
                .find(|reference| reference.name == word)
                .map(|reference| (word, Some(reference.kind)));
        }

        let documents_component = of_kind(references, ReferenceKind::Component)
            .any(|reference| matches_patterns(word, &reference.name));
        match header.annotations.get(index + 1).copied().flatten() {
            Some(Annotation::Note { text }) if documents_component => {
                Some((text, Some(ReferenceKind::Component)))
            }
            _ => Some((word, None)),
        }
    }

    /// Index of the first `@see` whose target falls in `kind` by name pattern,
    /// ignoring targets claimed by feature references. `0` when none exists.
    fn first_citation_of(
        &self,
        kind: ReferenceKind,
        references: &[Reference],
        header: &Header<'_>,
    ) -> usize {
        let want_internal = kind == ReferenceKind::Internal;

        header
            .annotations
            .iter()
            .enumerate()
            .find_map(|(index, annotation)| match annotation {
                Some(Annotation::See { target, .. }) => {
                    let claimed = of_kind(references, ReferenceKind::Feature)
                        .any(|reference| reference.name == *target);
                    (!claimed && self.policy.is_internal(target) == want_internal).then_some(index)
                }
                _ => None,
            })
            .unwrap_or(0)
    }
}

fn of_kind(
    references: &[Reference],
    kind: ReferenceKind,
) -> impl Iterator<Item = &Reference> + '_ {
    references.iter().filter(move |reference| reference.kind == kind)
}

fn check_citations_below(
    references: &[&Reference],
    header: &Header<'_>,
    boundary: usize,
) -> Result<(), Violation> {
    for reference in references {
        if let Some(index) = header.first_citation(&reference.name)
            && index < boundary
        {
            return Err(Violation::CitedTooHigh {
                kind: reference.kind,
                name: reference.name.clone(),
                boundary: header.lines[boundary].clone(),
            });
        }
    }
    Ok(())
}

/// Annotation lines with their parsed form, index-aligned.
struct Header<'a> {
    lines: &'a [String],
    annotations: Vec<Option<Annotation<'a>>>,
}

impl<'a> Header<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            annotations: lines.iter().map(|line| Annotation::parse(line)).collect(),
        }
    }

    /// Index of the first `@see` citing `name`.
    fn first_citation(&self, name: &str) -> Option<usize> {
        self.annotations.iter().position(|annotation| {
            matches!(annotation, Some(Annotation::See { target, .. }) if *target == name)
        })
    }

    /// Index of the first `@ref` with a pattern matching `name`.
    fn find_ref(&self, name: &str) -> Option<usize> {
        self.annotations.iter().position(|annotation| {
            matches!(annotation, Some(Annotation::Ref { patterns }) if matches_patterns(patterns, name))
        })
    }

    fn line_has_tag(&self, index: usize, tag: &str) -> bool {
        self.lines
            .get(index)
            .is_some_and(|line| line.starts_with(tag))
    }

    fn line_has_tag_before(&self, index: usize, tag: &str) -> bool {
        index > 0 && self.line_has_tag(index - 1, tag)
    }
}
