//! Batch merge engine.
//!
//! Rewrites any set of call sites, from one call to a whole program, as a
//! single atomic edit:
//!
//! 1. **Locate**: resolve each [`CallSiteHandle`] to its call expression and
//!    enclosing scope in the input snapshot
//! 2. **Extract**: classify and extract every call in parallel against that
//!    same snapshot
//! 3. **Plan**: group by enclosing scope, run the strategy, and schedule each
//!    generated name at most once per type
//! 4. **Commit**: on a clone of the snapshot, replace all calls in one pass
//!    per document, insert declarations, ensure the `using`
//!
//! Nothing is written until the commit succeeds. Any [`RewriteError`] yields
//! [`RewriteOutcome::Unchanged`] and the caller keeps the snapshot it passed in.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::classify::classify;
use crate::core::data::LogCallInfo;
use crate::core::error::{RewriteError, SkipReason};
use crate::core::extract::extract;
use crate::core::mutate::{
    ensure_container, ensure_partial, ensure_using, insert_method_if_absent, replace_calls,
};
use crate::core::oracle::TypeOracle;
use crate::core::strategy::{
    ContainerTarget, DeclarationShape, GeneratedDeclaration, RewriteOptions, RewriteStrategy,
};
use crate::core::syntax::{
    CallSite, Expr, IdAllocator, Member, NodeId, Program, ScopeKey, TypeDecl, collect_call_sites,
};

/// Stable reference to one call expression: the document it lives in and its
/// node id. Handles stay valid across clones of the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallSiteHandle {
    pub document: usize,
    pub call: NodeId,
}

impl CallSiteHandle {
    pub fn new(document: usize, call: NodeId) -> Self {
        Self { document, call }
    }
}

/// Counters for one committed rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Call expressions replaced.
    pub rewritten: usize,
    /// Generated methods inserted.
    pub declarations: usize,
    /// Targeted call sites left untouched.
    pub skipped: usize,
    /// Documents that changed.
    pub documents: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnchangedReason {
    /// The single targeted call site was skipped.
    Skipped(SkipReason),
    /// No targeted call site produced an edit.
    NothingToRewrite,
    /// Commit failed; every edit was discarded.
    Aborted(RewriteError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RewriteOutcome {
    Rewritten { program: Program, stats: RewriteStats },
    Unchanged { reason: UnchangedReason },
}

impl RewriteOutcome {
    pub fn program(&self) -> Option<&Program> {
        match self {
            RewriteOutcome::Rewritten { program, .. } => Some(program),
            RewriteOutcome::Unchanged { .. } => None,
        }
    }
}

/// Edits scheduled for one enclosing type.
#[derive(Debug, Clone, Default)]
pub struct ScopeEdits {
    /// `(call, replacement)` in source order.
    pub replacements: Vec<(NodeId, Expr)>,
    /// Deduplicated declarations to insert.
    pub declarations: Vec<GeneratedDeclaration>,
}

/// Every edit of a batch, computed against one snapshot.
#[derive(Debug, Clone)]
pub struct EditPlan {
    pub strategy: RewriteStrategy,
    pub groups: BTreeMap<ScopeKey, ScopeEdits>,
    pub skipped: Vec<(CallSiteHandle, SkipReason)>,
    ids: IdAllocator,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(|group| group.replacements.is_empty())
    }
}

pub struct RewriteEngine<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    options: RewriteOptions,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, O: TypeOracle + ?Sized> RewriteEngine<'a, O> {
    pub fn new(oracle: &'a O, options: RewriteOptions) -> Self {
        Self {
            oracle,
            options,
            cancel: None,
        }
    }

    /// Check `flag` between pipeline steps; once set, the run stops with
    /// [`RewriteError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    pub fn try_rewrite_single(
        &self,
        program: &Program,
        site: CallSiteHandle,
        strategy: RewriteStrategy,
    ) -> RewriteOutcome {
        let plan = match self.plan(program, &[site], strategy) {
            Ok(plan) => plan,
            Err(err) => return aborted(err),
        };
        if plan.is_empty() {
            let reason = plan
                .skipped
                .into_iter()
                .next()
                .map_or(UnchangedReason::NothingToRewrite, |(_, reason)| {
                    UnchangedReason::Skipped(reason)
                });
            return RewriteOutcome::Unchanged { reason };
        }
        self.finish(program, &plan)
    }

    pub fn try_rewrite_batch(
        &self,
        program: &Program,
        sites: &[CallSiteHandle],
        strategy: RewriteStrategy,
    ) -> RewriteOutcome {
        let plan = match self.plan(program, sites, strategy) {
            Ok(plan) => plan,
            Err(err) => return aborted(err),
        };
        if plan.is_empty() {
            return RewriteOutcome::Unchanged {
                reason: UnchangedReason::NothingToRewrite,
            };
        }
        self.finish(program, &plan)
    }

    fn finish(&self, program: &Program, plan: &EditPlan) -> RewriteOutcome {
        match self.commit(program, plan) {
            Ok((program, stats)) => {
                tracing::info!(
                    rewritten = stats.rewritten,
                    declarations = stats.declarations,
                    skipped = stats.skipped,
                    documents = stats.documents,
                    "Committed log call rewrite"
                );
                RewriteOutcome::Rewritten { program, stats }
            }
            Err(err) => aborted(err),
        }
    }

    /// Compute every edit for `sites` without touching `program`.
    pub fn plan(
        &self,
        program: &Program,
        sites: &[CallSiteHandle],
        strategy: RewriteStrategy,
    ) -> Result<EditPlan, RewriteError> {
        let (located, mut skipped) = locate(program, sites);
        self.check_cancelled()?;

        let extracted: Vec<(CallSite<'_>, Result<LogCallInfo, SkipReason>)> = located
            .into_par_iter()
            .map(|site| {
                let info = match classify(site.expr, self.oracle) {
                    Some(_) => extract(site.expr, self.oracle),
                    None => Err(SkipReason::NotALogCall),
                };
                (site, info)
            })
            .collect();
        self.check_cancelled()?;

        let mut ids = IdAllocator::after(program);
        let container = strategy.container(&self.options);
        let mut groups: BTreeMap<ScopeKey, ScopeEdits> = BTreeMap::new();
        // Method names already present or scheduled, per qualified type name,
        // so partial declarations across documents share one map. `None`
        // marks a method that is not a generated logging method.
        let mut names: HashMap<String, HashMap<String, Option<DeclarationShape>>> =
            HashMap::new();

        for (site, info) in extracted {
            let handle = CallSiteHandle::new(site.document, site.id());
            let scoped = info.and_then(|info| {
                site.scope_key()
                    .map(|key| (key, info))
                    .ok_or(SkipReason::NoEnclosingType)
            });
            let (key, info) = match scoped {
                Ok(scoped) => scoped,
                Err(reason) => {
                    tracing::debug!(
                        document = handle.document,
                        call = %handle.call,
                        %reason,
                        "Skipping call site"
                    );
                    skipped.push((handle, reason));
                    continue;
                }
            };

            let edit = strategy.plan(&info, &self.options, &mut ids)?;
            let namespace = program.documents[key.document].namespace.as_deref();
            let qualified = key.path.qualified_name(namespace);
            let known = names
                .entry(qualified.clone())
                .or_insert_with(|| declared_names(program, &qualified, &container));

            let shape = edit.declaration.shape();
            let is_new = match known.get(&edit.declaration.name) {
                None => true,
                Some(existing) if existing.as_ref() == Some(&shape) => false,
                Some(_) => {
                    let reason = SkipReason::NameConflict {
                        name: edit.declaration.name.clone(),
                    };
                    tracing::debug!(
                        document = handle.document,
                        call = %handle.call,
                        %reason,
                        "Skipping call site"
                    );
                    skipped.push((handle, reason));
                    continue;
                }
            };

            let group = groups.entry(key).or_default();
            group.replacements.push((edit.call, edit.replacement));
            if is_new {
                known.insert(edit.declaration.name.clone(), Some(shape));
                group.declarations.push(edit.declaration);
            }
        }

        Ok(EditPlan {
            strategy,
            groups,
            skipped,
            ids,
        })
    }

    /// Apply `plan` to a clone of `program`.
    pub fn commit(
        &self,
        program: &Program,
        plan: &EditPlan,
    ) -> Result<(Program, RewriteStats), RewriteError> {
        self.check_cancelled()?;
        let mut working = program.clone();
        let mut ids = plan.ids.clone();
        let mut stats = RewriteStats {
            skipped: plan.skipped.len(),
            ..RewriteStats::default()
        };

        let mut per_document: BTreeMap<usize, HashMap<NodeId, Expr>> = BTreeMap::new();
        for (key, group) in &plan.groups {
            let replacements = per_document.entry(key.document).or_default();
            for (call, replacement) in &group.replacements {
                replacements.insert(*call, replacement.clone());
            }
        }

        for (&index, replacements) in &per_document {
            let count = replacements.len();
            let document = working
                .documents
                .get_mut(index)
                .ok_or(RewriteError::DocumentNotFound(index))?;
            replace_calls(index, document, replacements.clone())?;
            stats.rewritten += count;
        }
        self.check_cancelled()?;

        let container = plan.strategy.container(&self.options);
        for (key, group) in &plan.groups {
            let document = working
                .documents
                .get_mut(key.document)
                .ok_or(RewriteError::DocumentNotFound(key.document))?;
            let ty = document
                .type_at_mut(&key.path)
                .ok_or_else(|| RewriteError::ScopeNotFound { scope: key.clone() })?;
            ensure_partial(ty);

            let target = match &container {
                ContainerTarget::Enclosing => ty,
                ContainerTarget::Nested(name) => ensure_container(ty, name, &mut ids)?,
            };
            for declaration in &group.declarations {
                if insert_method_if_absent(target, declaration.to_method(ids.next_id()?)) {
                    tracing::debug!(
                        scope = %key.path,
                        method = %declaration.name,
                        "Inserted generated declaration"
                    );
                    stats.declarations += 1;
                }
            }
        }

        for &index in per_document.keys() {
            if let Some(document) = working.documents.get_mut(index) {
                ensure_using(document, &self.options.logging_namespace);
            }
        }
        stats.documents = per_document.len();

        Ok((working, stats))
    }

    fn check_cancelled(&self) -> Result<(), RewriteError> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(RewriteError::Cancelled),
            _ => Ok(()),
        }
    }
}

fn aborted(err: RewriteError) -> RewriteOutcome {
    tracing::warn!(error = %err, "Rewrite aborted, snapshot left unchanged");
    RewriteOutcome::Unchanged {
        reason: UnchangedReason::Aborted(err),
    }
}

/// Resolve handles to call sites, in document then source order. Duplicate
/// handles collapse; unknown ones are reported as skipped.
fn locate<'p>(
    program: &'p Program,
    sites: &[CallSiteHandle],
) -> (Vec<CallSite<'p>>, Vec<(CallSiteHandle, SkipReason)>) {
    let wanted: BTreeSet<CallSiteHandle> = sites.iter().copied().collect();
    let mut by_document: BTreeMap<usize, HashSet<NodeId>> = BTreeMap::new();
    for handle in &wanted {
        by_document
            .entry(handle.document)
            .or_default()
            .insert(handle.call);
    }

    let mut located = Vec::new();
    for (&index, calls) in &by_document {
        let Some(document) = program.documents.get(index) else {
            continue;
        };
        located.extend(
            collect_call_sites(index, document)
                .into_iter()
                .filter(|site| calls.contains(&site.id())),
        );
    }

    let located_handles: HashSet<CallSiteHandle> = located
        .iter()
        .map(|site| CallSiteHandle::new(site.document, site.id()))
        .collect();
    let skipped = wanted
        .into_iter()
        .filter(|handle| !located_handles.contains(handle))
        .map(|handle| (handle, SkipReason::UnknownCallSite))
        .collect();

    (located, skipped)
}

/// Methods already declared in the `container` of every partial declaration
/// of the type named `qualified`, with their logging shape.
fn declared_names(
    program: &Program,
    qualified: &str,
    container: &ContainerTarget,
) -> HashMap<String, Option<DeclarationShape>> {
    let mut names = HashMap::new();
    for document in &program.documents {
        let prefix = document.namespace.as_deref().unwrap_or_default();
        for ty in &document.types {
            collect_declared_names(ty, prefix, qualified, container, &mut names);
        }
    }
    names
}

fn collect_declared_names(
    ty: &TypeDecl,
    outer: &str,
    qualified: &str,
    container: &ContainerTarget,
    names: &mut HashMap<String, Option<DeclarationShape>>,
) {
    let name = if outer.is_empty() {
        ty.name.clone()
    } else {
        format!("{}.{}", outer, ty.name)
    };

    if name == qualified {
        let target = match container {
            ContainerTarget::Enclosing => Some(ty),
            ContainerTarget::Nested(container) => ty.nested_type(container),
        };
        for member in target.iter().flat_map(|target| &target.members) {
            if let Member::Method(method) = member {
                names
                    .entry(method.name.clone())
                    .or_insert_with(|| DeclarationShape::of_method(method));
            }
        }
    }

    for member in &ty.members {
        if let Member::Type(nested) = member {
            collect_declared_names(nested, &name, qualified, container, names);
        }
    }
}
