//! Random mutator
//!
//! Applies a handful of independent local edits to one document. Each step
//! draws a category by weight, then an operation uniformly within it, then a
//! uniformly random target that the operation can act on.
//!
//! A step whose operation finds no target is skipped and not recorded, so
//! step numbers are always contiguous over the applied mutations.

mod chart;
mod colors;
mod content;
pub mod generators;
mod layout;
mod ops;
mod sizes;
mod structure;
mod style;

use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use widget_dsl::tree::{self, NodePath};
use widget_dsl::{Container, Leaf, Node, Rulebook, WidgetDocument};

use crate::constants::mutation::{MAX_SELECTION_RETRIES, MAX_STEPS, MIN_STEPS};
use crate::error::{EngineError, Result};
use crate::palette::Palette;
use crate::records::MutationRecord;

pub use ops::{MutationCategory, MutationOp, OpHandler};

/// Read-only inputs every operation handler receives
pub struct MutationContext<'a> {
    pub palette: &'a Palette,
    /// Operations never grow a container past this many children
    pub max_children: usize,
    /// Operations that deepen the tree stay within this many levels
    pub max_depth: usize,
}

/// A mutated document and the mutations that produced it
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub document: WidgetDocument,
    pub mutations: Vec<MutationRecord>,
}

/// Weighted random mutator
pub struct RandomMutator {
    palette: Arc<Palette>,
    max_children: usize,
    max_depth: usize,
    categories: WeightedIndex<f64>,
}

impl RandomMutator {
    /// Create a mutator drawing categories by the palette's weights and
    /// respecting the rulebook's structural limits
    pub fn new(palette: Arc<Palette>, rulebook: &Rulebook) -> Result<Self> {
        let weights: Vec<f64> = MutationCategory::ALL
            .iter()
            .map(|c| palette.category_weights.get(c).copied().unwrap_or(0.0))
            .collect();
        let categories = WeightedIndex::new(weights)
            .map_err(|e| EngineError::config(format!("Invalid category weights: {}", e)))?;
        Ok(Self {
            palette,
            max_children: rulebook.max_children_per_container,
            max_depth: rulebook.max_depth,
            categories,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Mutate a copy of `document` with 2 to 6 attempted steps
    pub fn mutate(&self, document: &WidgetDocument, rng: &mut StdRng) -> MutationOutcome {
        self.mutate_from_step(document, 0, rng)
    }

    /// Like [`mutate`](Self::mutate), numbering steps after `previous_steps`
    /// earlier mutations
    pub fn mutate_from_step(
        &self,
        document: &WidgetDocument,
        previous_steps: usize,
        rng: &mut StdRng,
    ) -> MutationOutcome {
        let mut document = document.clone();
        let mut mutations = Vec::new();
        let count = rng.gen_range(MIN_STEPS..=MAX_STEPS);

        for _ in 0..count {
            let Some(op) = self.select_operation(&document, rng) else {
                log::debug!("No applicable operation after retries, skipping step");
                continue;
            };
            let step = previous_steps + mutations.len() + 1;
            match self.apply(&mut document, op, step, rng) {
                Some(record) => mutations.push(record),
                None => log::debug!("{} found no target, skipping step", op),
            }
        }

        MutationOutcome { document, mutations }
    }

    /// Apply one operation in place. Returns `None` without touching the
    /// document when the operation is inapplicable or finds no target.
    pub fn apply(
        &self,
        document: &mut WidgetDocument,
        op: MutationOp,
        step: usize,
        rng: &mut StdRng,
    ) -> Option<MutationRecord> {
        if !self.is_applicable(document, op) {
            return None;
        }
        let context = self.context();
        let change = (op.handler())(document, &context, rng)?;
        Some(change.into_record(step, op.name(), op.category().as_str()))
    }

    fn context(&self) -> MutationContext<'_> {
        MutationContext {
            palette: &self.palette,
            max_children: self.max_children,
            max_depth: self.max_depth,
        }
    }

    fn is_applicable(&self, document: &WidgetDocument, op: MutationOp) -> bool {
        !op.requires_chart() || tree::has_chart(document.root())
    }

    fn select_operation(&self, document: &WidgetDocument, rng: &mut StdRng) -> Option<MutationOp> {
        for _ in 0..=MAX_SELECTION_RETRIES {
            let category = MutationCategory::ALL[self.categories.sample(rng)];
            let Some(&op) = category.operations().choose(rng) else {
                continue;
            };
            if self.is_applicable(document, op) {
                return Some(op);
            }
        }
        None
    }
}

/// Random leaf path whose leaf satisfies `predicate`
pub(crate) fn pick_leaf<P>(document: &WidgetDocument, rng: &mut StdRng, predicate: P) -> Option<NodePath>
where
    P: Fn(&Leaf, &NodePath) -> bool,
{
    tree::random_matching(document.root(), rng, |node, path| {
        node.as_leaf().map_or(false, |leaf| predicate(leaf, path))
    })
}

/// Random container path whose container satisfies `predicate`
pub(crate) fn pick_container<P>(
    document: &WidgetDocument,
    rng: &mut StdRng,
    predicate: P,
) -> Option<NodePath>
where
    P: Fn(&Container, &NodePath) -> bool,
{
    tree::random_matching(document.root(), rng, |node, path| {
        node.as_container().map_or(false, |c| predicate(c, path))
    })
}

pub(crate) fn leaf_mut<'d>(document: &'d mut WidgetDocument, path: &NodePath) -> Option<&'d mut Leaf> {
    tree::node_at_mut(document.root_mut(), path)?.as_leaf_mut()
}

pub(crate) fn container_mut<'d>(
    document: &'d mut WidgetDocument,
    path: &NodePath,
) -> Option<&'d mut Container> {
    tree::node_at_mut(document.root_mut(), path)?.as_container_mut()
}

pub(crate) fn node_mut<'d>(document: &'d mut WidgetDocument, path: &NodePath) -> Option<&'d mut Node> {
    tree::node_at_mut(document.root_mut(), path)
}
