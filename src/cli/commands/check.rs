use anyhow::Result;

use super::super::args::CheckCommand;
use super::{CheckSummary, CommandResult, CommandSummary, helper::finish};
use crate::{core::CheckContext, issues::Issue, rules::check_module_reference_issues};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = CheckContext::new(&cmd.common.root, &cmd.paths)?;

    let mut all_issues: Vec<Issue> = check_module_reference_issues(&ctx);

    let read_errors = ctx.source_errors();
    all_issues.extend(read_errors.iter().map(|i| Issue::ParseError(i.clone())));

    tracing::debug!(
        files = ctx.files.len(),
        issues = all_issues.len(),
        "check finished"
    );

    Ok(finish(
        CommandSummary::Check(CheckSummary { format: cmd.format }),
        all_issues,
        ctx.files.len(),
    ))
}
