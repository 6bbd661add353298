//! Finding collection.
//!
//! Runs the classifier over every call site of a program and reports each
//! match as a [`Finding`]. Documents are scanned in parallel; findings come
//! back in document order, then source order.

use rayon::prelude::*;

use crate::core::batch::CallSiteHandle;
use crate::core::classify::classify;
use crate::core::data::SourceLocation;
use crate::core::oracle::TypeOracle;
use crate::core::syntax::{Program, collect_call_sites, render_expr};

/// Code attached to every finding.
pub const FINDING_CODE: &str = "LGEN001";

/// A log call that can be rewritten to a generated logging method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: &'static str,
    pub site: CallSiteHandle,
    /// `LogInformation`, `LogError`, ...
    pub method_name: String,
    pub location: SourceLocation,
    /// Fully qualified name of the enclosing type, if any.
    pub scope: Option<String>,
    /// The call as rendered source text.
    pub snippet: String,
}

/// Receives findings as they are produced.
pub trait FindingSink {
    fn report(&mut self, finding: Finding);
}

impl FindingSink for Vec<Finding> {
    fn report(&mut self, finding: Finding) {
        self.push(finding);
    }
}

pub fn scan_program<O>(program: &Program, oracle: &O) -> Vec<Finding>
where
    O: TypeOracle + ?Sized,
{
    let mut findings = Vec::new();
    scan_into(program, oracle, &mut findings);
    findings
}

/// Scan `program` and feed every finding to `sink`, in order.
pub fn scan_into<O, S>(program: &Program, oracle: &O, sink: &mut S)
where
    O: TypeOracle + ?Sized,
    S: FindingSink + ?Sized,
{
    let per_document: Vec<Vec<Finding>> = program
        .documents
        .par_iter()
        .enumerate()
        .map(|(index, document)| {
            collect_call_sites(index, document)
                .into_iter()
                .filter_map(|site| {
                    let matched = classify(site.expr, oracle)?;
                    let span = site.span();
                    Some(Finding {
                        code: FINDING_CODE,
                        site: CallSiteHandle::new(index, site.id()),
                        method_name: matched.method_name,
                        location: SourceLocation::new(
                            &document.path,
                            span.map_or(0, |span| span.line),
                            span.map_or(0, |span| span.col),
                        ),
                        scope: (!site.scope.is_empty())
                            .then(|| site.scope.qualified_name(document.namespace.as_deref())),
                        snippet: render_expr(site.expr),
                    })
                })
                .collect()
        })
        .collect();

    for finding in per_document.into_iter().flatten() {
        sink.report(finding);
    }
}

/// Which findings a fix-all run targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAllScope {
    /// Every finding whose enclosing type has this fully qualified name,
    /// across all documents.
    Type(String),
    /// Every finding in the document with this path.
    Document(String),
    Program,
}

impl FixAllScope {
    pub fn contains(&self, finding: &Finding) -> bool {
        self.matches(&finding.location.file_path, finding.scope.as_deref())
    }

    /// Whether a call in `file_path`, enclosed by the type `scope`, is targeted.
    pub fn matches(&self, file_path: &str, scope: Option<&str>) -> bool {
        match self {
            FixAllScope::Type(name) => scope == Some(name.as_str()),
            FixAllScope::Document(path) => file_path == path,
            FixAllScope::Program => true,
        }
    }

    /// Handles of the findings inside this scope.
    pub fn select(&self, findings: &[Finding]) -> Vec<CallSiteHandle> {
        findings
            .iter()
            .filter(|finding| self.contains(finding))
            .map(|finding| finding.site)
            .collect()
    }
}
