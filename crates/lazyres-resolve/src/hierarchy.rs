//! Inheritance cycle cuts.
//!
//! Cuts are decided on the declared supertype graph: every class's supertypes
//! after error filtering and defaults, before any cycle breaking, plus an edge
//! from each nested class to its containing class. The outcome is a function
//! of that graph alone, so it does not depend on which class (or which
//! thread) asked first.
//!
//! Within one strongly connected component, classes are visited in
//! `(fq name, file, offset)` order and each supertype edge `X : S` is cut when
//! `S` still reaches `X` through the edges kept so far. Containment edges are
//! never cut. What remains is acyclic: a kept edge `X : S` had no path back
//! from `S` when it was checked, and later cuts only remove paths.
//!
//! All walks use explicit stacks; component size is bounded only by the
//! program.

use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::session::ResolveSession;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Outgoing edges of one class in the declared graph.
struct Edges {
    /// Class targets of the declared supertypes, by supertype index.
    supertypes: Vec<Option<ClassId>>,
    container: Option<ClassId>,
}

impl Edges {
    fn targets(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.supertypes.iter().flatten().copied().chain(self.container)
    }
}

type Graph = FxHashMap<ClassId, Edges>;

/// Indices into `class`'s declared supertypes that must be cut.
pub(crate) fn cut_edges(ctx: &ResolveSession, class: ClassId) -> ResolveResult<Arc<[usize]>> {
    if let Some(cuts) = ctx.cycle_cuts().get(&class) {
        return Ok(Arc::clone(cuts.value()));
    }

    let graph = reachable_graph(ctx, class)?;
    let component = component_of(&graph, class);
    let self_loop = graph
        .get(&class)
        .is_some_and(|edges| edges.supertypes.contains(&Some(class)));
    if component.len() == 1 && !self_loop {
        return Ok(Arc::from(Vec::new()));
    }

    let order = visiting_order(ctx, &component)?;
    let cuts = cut_component(&graph, &component, &order);
    debug!(class = %class, component = component.len(), "cut inheritance cycles");

    let mut own: Arc<[usize]> = Arc::from(Vec::new());
    for member in order {
        let member_cuts: Arc<[usize]> = cuts.get(&member).cloned().unwrap_or_default().into();
        let stored = ctx
            .cycle_cuts()
            .entry(member)
            .or_insert(member_cuts)
            .value()
            .clone();
        if member == class {
            own = stored;
        }
    }
    Ok(own)
}

/// Declared edges of every class reachable from `start`, `start` included.
fn reachable_graph(ctx: &ResolveSession, start: ClassId) -> ResolveResult<Graph> {
    let mut graph = Graph::default();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if graph.contains_key(&id) {
            continue;
        }
        let class = ctx.class(id)?;
        let declared = class.declared_supertypes(ctx)?;
        let edges = Edges {
            supertypes: declared
                .true_supertypes
                .iter()
                .map(|ty| ty.class_id())
                .collect(),
            container: class.container().as_class(),
        };
        stack.extend(edges.targets().filter(|target| !graph.contains_key(target)));
        graph.insert(id, edges);
    }
    Ok(graph)
}

/// Classes of `graph` that reach `class` back: its strongly connected
/// component, since every node of `graph` is reachable from `class`.
fn component_of(graph: &Graph, class: ClassId) -> FxHashSet<ClassId> {
    let mut reverse: FxHashMap<ClassId, Vec<ClassId>> = FxHashMap::default();
    for (&from, edges) in graph {
        for to in edges.targets() {
            reverse.entry(to).or_default().push(from);
        }
    }

    let mut component = FxHashSet::default();
    let mut stack = vec![class];
    while let Some(id) = stack.pop() {
        if !component.insert(id) {
            continue;
        }
        if let Some(sources) = reverse.get(&id) {
            stack.extend(sources.iter().filter(|source| !component.contains(*source)));
        }
    }
    component
}

fn visiting_order(ctx: &ResolveSession, component: &FxHashSet<ClassId>) -> ResolveResult<Vec<ClassId>> {
    let mut keyed = Vec::with_capacity(component.len());
    for &id in component {
        let class = ctx.class(id)?;
        let anchor = class.anchor();
        keyed.push((
            class.fq_name().clone(),
            anchor.file.clone(),
            anchor.span.start,
            id,
        ));
    }
    keyed.sort();
    Ok(keyed.into_iter().map(|(.., id)| id).collect())
}

fn cut_component(
    graph: &Graph,
    component: &FxHashSet<ClassId>,
    order: &[ClassId],
) -> FxHashMap<ClassId, Vec<usize>> {
    let mut cuts: FxHashMap<ClassId, Vec<usize>> = FxHashMap::default();
    for &class in order {
        let Some(edges) = graph.get(&class) else {
            continue;
        };
        for (index, target) in edges.supertypes.iter().enumerate() {
            let Some(target) = *target else {
                continue;
            };
            if component.contains(&target) && reaches(graph, component, &cuts, target, class) {
                cuts.entry(class).or_default().push(index);
            }
        }
    }
    cuts
}

/// Whether `to` is reachable from `from` inside `component` over kept edges.
fn reaches(
    graph: &Graph,
    component: &FxHashSet<ClassId>,
    cuts: &FxHashMap<ClassId, Vec<usize>>,
    from: ClassId,
    to: ClassId,
) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        if id == to {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        let Some(edges) = graph.get(&id) else {
            continue;
        };
        let cut = cuts.get(&id);
        let kept = edges
            .supertypes
            .iter()
            .enumerate()
            .filter(|(index, _)| !cut.is_some_and(|cut| cut.contains(index)))
            .filter_map(|(_, target)| *target);
        stack.extend(
            kept.chain(edges.container)
                .filter(|next| component.contains(next) && !visited.contains(next)),
        );
    }
    false
}

#[cfg(test)]
#[path = "tests/hierarchy_tests.rs"]
mod tests;
