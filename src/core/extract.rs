//! Dependency extraction from a declaration body.
//!
//! The body is walked by a small state machine that recognizes three
//! constructs:
//!
//! - `include <name>`
//! - `class { '<name>': ... }`
//! - `role::include_features({ '<feature>' => [<name>, ...] })`
//!
//! Only tokens that can drive a transition are routed into the machine; every
//! other token is ignored. A routed token without a transition in the current
//! state aborts extraction with a [`StructuralError`].

use std::fmt;

use thiserror::Error;

use crate::core::token::{Token, TokenKind};

/// The batch feature-enable construct.
pub const FEATURES_CONSTRUCT: &str = "role::include_features";

const INCLUDE_KEYWORD: &str = "include";
const CLASS_KEYWORD: &str = "class";

/// Category of a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Internal,
    Component,
    Feature,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Internal => write!(f, "internal"),
            ReferenceKind::Component => write!(f, "component"),
            ReferenceKind::Feature => write!(f, "feature"),
        }
    }
}

/// A single dependency occurrence, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub name: String,
    /// The token that completed the reference.
    pub origin: Token,
}

/// Classifies names into internal and component references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePolicy {
    internal_prefixes: Vec<String>,
}

impl ReferencePolicy {
    pub fn new(internal_prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            internal_prefixes: internal_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when the name lives under one of the internal namespaces
    /// (`profile::base`, but not `profiles::base` or `profile`).
    pub fn is_internal(&self, name: &str) -> bool {
        self.internal_prefixes.iter().any(|prefix| {
            name.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
        })
    }

    pub fn classify(&self, name: &str) -> ReferenceKind {
        if self.is_internal(name) {
            ReferenceKind::Internal
        } else {
            ReferenceKind::Component
        }
    }
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self::new(["role", "profile"])
    }
}

/// States of the extraction machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    Start,
    AwaitingIncludeName,
    AwaitingClassName,
    AwaitingFeatureListStart,
    AwaitingFeatureName,
    FeatureListClosed,
}

impl fmt::Display for ExtractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractState::Start => "start",
            ExtractState::AwaitingIncludeName => "awaiting_include_name",
            ExtractState::AwaitingClassName => "awaiting_class_name",
            ExtractState::AwaitingFeatureListStart => "awaiting_feature_list_start",
            ExtractState::AwaitingFeatureName => "awaiting_feature_name",
            ExtractState::FeatureListClosed => "feature_list_closed",
        };
        write!(f, "{}", name)
    }
}

/// A token arrived in a state that has no transition for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Can not process the token '{}' in the state {state}", token.text.trim())]
pub struct StructuralError {
    pub token: Token,
    pub state: ExtractState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event<'a> {
    Include,
    Class,
    FeaturesStart,
    ListOpen,
    ListClose,
    FeaturesEnd,
    Name(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    None,
    /// Emit an internal or component reference for the name.
    Emit,
    /// Remember the name as a pending feature dependency.
    Buffer,
    /// Emit one feature reference per pending name.
    Flush,
}

fn is_trigger_word(text: &str) -> bool {
    matches!(text, INCLUDE_KEYWORD | CLASS_KEYWORD | FEATURES_CONSTRUCT)
}

/// The transition table. `None` means the event is invalid in that state.
fn transition(state: ExtractState, event: Event<'_>) -> Option<(ExtractState, Effect)> {
    use ExtractState::*;

    match (state, event) {
        (Start, Event::Include) => Some((AwaitingIncludeName, Effect::None)),
        (AwaitingIncludeName, Event::Name(_)) => Some((Start, Effect::Emit)),
        (Start, Event::Class) => Some((AwaitingClassName, Effect::None)),
        (AwaitingClassName, Event::Name(_)) => Some((Start, Effect::Emit)),
        (Start, Event::FeaturesStart) => Some((AwaitingFeatureListStart, Effect::None)),
        (AwaitingFeatureListStart, Event::ListOpen) => Some((AwaitingFeatureName, Effect::None)),
        (AwaitingFeatureName, Event::Name(_)) => Some((AwaitingFeatureName, Effect::Buffer)),
        (AwaitingFeatureName, Event::ListClose) => Some((FeatureListClosed, Effect::None)),
        (FeatureListClosed, Event::FeaturesEnd) => Some((Start, Effect::Flush)),
        _ => None,
    }
}

/// Streaming extractor for one declaration body.
#[derive(Debug)]
pub struct ReferenceExtractor<'p> {
    policy: &'p ReferencePolicy,
    state: ExtractState,
    pending_features: Vec<String>,
    references: Vec<Reference>,
}

impl<'p> ReferenceExtractor<'p> {
    pub fn new(policy: &'p ReferencePolicy) -> Self {
        Self {
            policy,
            state: ExtractState::Start,
            pending_features: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Feed one significant token to the machine.
    pub fn feed(&mut self, token: &Token) -> Result<(), StructuralError> {
        let Some(event) = self.route(token) else {
            return Ok(());
        };

        let (next, effect) = transition(self.state, event).ok_or_else(|| StructuralError {
            token: token.clone(),
            state: self.state,
        })?;

        match (effect, event) {
            (Effect::Emit, Event::Name(name)) => self.references.push(Reference {
                kind: self.policy.classify(name),
                name: name.to_string(),
                origin: token.clone(),
            }),
            (Effect::Buffer, Event::Name(name)) => self.pending_features.push(name.to_string()),
            (Effect::Flush, _) => {
                for name in self.pending_features.drain(..) {
                    self.references.push(Reference {
                        kind: ReferenceKind::Feature,
                        name,
                        origin: token.clone(),
                    });
                }
            }
            _ => {}
        }

        self.state = next;
        Ok(())
    }

    pub fn finish(self) -> Vec<Reference> {
        self.references
    }

    /// Translate a token into an event, or `None` when the token cannot
    /// influence the machine in its current state.
    fn route<'t>(&self, token: &'t Token) -> Option<Event<'t>> {
        if token.kind.is_comment() {
            return None;
        }

        match token.text.as_str() {
            INCLUDE_KEYWORD => return Some(Event::Include),
            CLASS_KEYWORD => return Some(Event::Class),
            FEATURES_CONSTRUCT => return Some(Event::FeaturesStart),
            _ => {}
        }

        match (token.kind, self.state) {
            (TokenKind::LBrack, ExtractState::AwaitingFeatureListStart) => Some(Event::ListOpen),
            (TokenKind::RBrack, ExtractState::AwaitingFeatureName) => Some(Event::ListClose),
            (TokenKind::RBrace, ExtractState::FeatureListClosed) => Some(Event::FeaturesEnd),
            (
                kind,
                ExtractState::AwaitingIncludeName
                | ExtractState::AwaitingClassName
                | ExtractState::AwaitingFeatureName,
            ) if kind.is_name_like() && !is_trigger_word(&token.text) => {
                Some(Event::Name(token.text.as_str()))
            }
            _ => None,
        }
    }
}

/// Result of walking one declaration body.
///
/// When the walk aborts, `references` holds everything emitted before the
/// offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub references: Vec<Reference>,
    pub error: Option<StructuralError>,
}

/// Extract the ordered dependency references of a declaration body.
pub fn extract_references(body: &[Token], policy: &ReferencePolicy) -> Extraction {
    let mut extractor = ReferenceExtractor::new(policy);

    for token in body.iter().filter(|t| t.is_significant()) {
        if let Err(error) = extractor.feed(token) {
            return Extraction {
                references: extractor.finish(),
                error: Some(error),
            };
        }
    }

    Extraction {
        references: extractor.finish(),
        error: None,
    }
}
