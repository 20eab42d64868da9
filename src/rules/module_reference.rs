//! Module reference documentation rule.
//!
//! Every class and defined type must document, in the comment header above
//! it, the modules its body pulls in: internal classes with `@see`, external
//! components with an `@ref` / `@note` / `@see` triplet pointing at the forge,
//! and feature classes with `@see`, grouped and sorted.

use rayon::prelude::*;

use crate::{
    core::{
        CheckContext, SourceContext, Token,
        body::find_body_start,
        comments::collect_annotations,
        declarations::{Declaration, find_declarations},
        directives::IgnoreContext,
        extract::{ReferencePolicy, extract_references},
        lexer::tokenize,
        validate::AnnotationValidator,
    },
    issues::{Issue, MissingBodyIssue, ReferenceIssue, UnexpectedTokenIssue},
};

pub fn check_module_reference_issues(ctx: &CheckContext) -> Vec<Issue> {
    let policy = ctx.config.reference_policy();
    let rule = ModuleReferenceRule::new(&policy, &ctx.config.forge_url, ctx.config.fail_fast);

    ctx.sources()
        .par_iter()
        .flat_map_iter(|file| rule.check_source(&file.path, &file.source))
        .collect()
}

/// Checks the declarations of one manifest at a time.
#[derive(Debug, Clone, Copy)]
pub struct ModuleReferenceRule<'a> {
    policy: &'a ReferencePolicy,
    forge_url: &'a str,
    fail_fast: bool,
}

impl<'a> ModuleReferenceRule<'a> {
    pub fn new(policy: &'a ReferencePolicy, forge_url: &'a str, fail_fast: bool) -> Self {
        Self {
            policy,
            forge_url,
            fail_fast,
        }
    }

    /// Check every declaration in `source`, classes first.
    ///
    /// With `fail_fast` the file stops at the first declaration whose header
    /// fails validation. Unexpected tokens and missing bodies are reported but do
    /// not stop it.
    pub fn check_source(&self, file_path: &str, source: &str) -> Vec<Issue> {
        let tokens = tokenize(source);
        let ignore = IgnoreContext::from_tokens(&tokens);
        let mut issues = Vec::new();

        for declaration in find_declarations(&tokens) {
            let keyword = &tokens[declaration.start];
            if ignore.should_ignore(keyword.line) {
                tracing::debug!(
                    file = file_path,
                    line = keyword.line,
                    name = %declaration.name,
                    "declaration ignored by control comment"
                );
                continue;
            }

            let found = self.check_declaration(file_path, source, &tokens, &declaration);
            let failed = found
                .iter()
                .any(|issue| matches!(issue, Issue::Reference(_)));
            issues.extend(found);

            if failed && self.fail_fast {
                break;
            }
        }

        issues
    }

    fn check_declaration(
        &self,
        file_path: &str,
        source: &str,
        tokens: &[Token],
        declaration: &Declaration,
    ) -> Vec<Issue> {
        let label = format!("{} {}", declaration.kind, declaration.name);
        let context_at =
            |line: usize, col: usize| SourceContext::from_source(file_path, source, line, col);

        tracing::debug!(file = file_path, declaration = %label, "checking declaration");

        let declaration_tokens = declaration.tokens(tokens);
        let Some(body_start) = find_body_start(declaration_tokens) else {
            let keyword = &tokens[declaration.start];
            return vec![Issue::MissingBody(MissingBodyIssue {
                context: context_at(keyword.line, keyword.column),
                declaration: label,
            })];
        };

        let mut issues = Vec::new();

        // Validation still runs on the references found before an abort.
        let extraction = extract_references(&declaration_tokens[body_start..], self.policy);
        if let Some(error) = extraction.error {
            tracing::debug!(declaration = %label, error = %error, "extraction aborted");
            issues.push(Issue::UnexpectedToken(UnexpectedTokenIssue {
                context: context_at(error.token.line, error.token.column),
                declaration: label.clone(),
                error,
            }));
        }

        let lines = collect_annotations(tokens, declaration.start);
        let validator = AnnotationValidator::new(self.policy, self.forge_url);
        if let Err(violation) = validator.validate(&extraction.references, &lines) {
            let (line, col) = violation.position();
            issues.push(Issue::Reference(ReferenceIssue {
                context: context_at(line, col),
                declaration: label,
                violation,
            }));
        }

        issues
    }
}
