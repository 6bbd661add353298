use anyhow::Result;

use super::super::{args::CheckCommand, exit_status::ExitStatus, report};
use crate::context::CheckContext;

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.args.common)?;
    let issues = ctx.issues();

    if issues.is_empty() {
        report::print_success(ctx.document_count());
        return Ok(ExitStatus::Success);
    }

    report::report(issues);
    Ok(ExitStatus::Failure)
}
