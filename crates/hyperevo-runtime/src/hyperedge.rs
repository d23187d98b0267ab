//! Hyperedges - weighted membership groups.
//!
//! A hyperedge is an ordered list of node ids tagged with an interaction
//! type, plus one weight per member. Hyperedges are never edited: when a
//! member's mutation rate drifts past the threshold the whole group is
//! formed again with fresh random weights and replaces the old one.
//!
//! The registry buckets hyperedges by interaction type and, within a
//! bucket, keys them by their member tuple. Both levels are ordered maps
//! so that reformation consumes random draws in a fixed order.

use crate::node::WeightLookup;
use hyperevo_core::error::{HyperevoError, Result};
use hyperevo_core::types::{InteractionType, NodeId, ValueRange};
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// The member tuple identifying a hyperedge within its bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HyperedgeKey(pub Vec<NodeId>);

impl HyperedgeKey {
    pub fn members(&self) -> &[NodeId] {
        &self.0
    }
}

/// A weighted group of nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperedge {
    pub interaction_type: InteractionType,
    members: Vec<NodeId>,
    weights: BTreeMap<NodeId, f64>,
}

impl Hyperedge {
    /// Build a hyperedge with one fresh weight per member drawn from
    /// `weight_range`. Repeated ids keep their first position.
    pub fn form<R: Rng + ?Sized>(
        members: &[NodeId],
        interaction_type: InteractionType,
        weight_range: ValueRange,
        rng: &mut R,
    ) -> Result<Self> {
        let mut unique: Vec<NodeId> = Vec::with_capacity(members.len());
        for id in members {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return Err(HyperevoError::EmptyHyperedge);
        }

        let weights = unique
            .iter()
            .map(|id| (*id, rng.gen_range(weight_range.min..=weight_range.max)))
            .collect();

        Ok(Self {
            interaction_type,
            members: unique,
            weights,
        })
    }

    pub fn key(&self) -> HyperedgeKey {
        HyperedgeKey(self.members.clone())
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.weights.contains_key(id)
    }

    pub fn weight(&self, id: &NodeId) -> Option<f64> {
        self.weights.get(id).copied()
    }

    pub fn weights(&self) -> &BTreeMap<NodeId, f64> {
        &self.weights
    }
}

/// A hyperedge that `evolve_hyperedges` replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reformation {
    pub interaction_type: InteractionType,
    pub key: HyperedgeKey,
    /// The member whose mutation rate triggered the reform.
    pub trigger: NodeId,
}

/// Owns every hyperedge, bucketed by interaction type.
#[derive(Debug, Clone)]
pub struct HyperedgeRegistry {
    buckets: BTreeMap<InteractionType, BTreeMap<HyperedgeKey, Hyperedge>>,
    weight_range: ValueRange,
    drift_threshold: f64,
}

impl HyperedgeRegistry {
    pub fn new(weight_range: ValueRange, drift_threshold: f64) -> Self {
        Self {
            buckets: BTreeMap::new(),
            weight_range,
            drift_threshold,
        }
    }

    /// Form a hyperedge and store it under `interaction_type`, replacing any
    /// hyperedge with the same member tuple in that bucket.
    pub fn form_new_hyperedge<R: Rng + ?Sized>(
        &mut self,
        members: &[NodeId],
        interaction_type: InteractionType,
        rng: &mut R,
    ) -> Result<HyperedgeKey> {
        let edge = Hyperedge::form(members, interaction_type, self.weight_range, rng)?;
        let key = edge.key();
        self.buckets
            .entry(interaction_type)
            .or_default()
            .insert(key.clone(), edge);
        Ok(key)
    }

    /// Reform every hyperedge with a member whose mutation rate exceeds the
    /// drift threshold. Others are kept as they are.
    ///
    /// `mutation_rate` resolves a member id to its current rate; members it
    /// cannot resolve count as not drifted.
    pub fn evolve_hyperedges<F, R>(&mut self, mutation_rate: F, rng: &mut R) -> Result<Vec<Reformation>>
    where
        F: Fn(NodeId) -> Option<f64>,
        R: Rng + ?Sized,
    {
        let mut reformed = Vec::new();

        for (interaction_type, bucket) in self.buckets.iter_mut() {
            for (key, edge) in bucket.iter_mut() {
                let mut trigger = None;
                for &member in edge.members() {
                    match mutation_rate(member) {
                        Some(rate) if rate > self.drift_threshold => {
                            trigger = Some(member);
                            break;
                        }
                        Some(_) => {}
                        None => warn!(node = %member, "hyperedge member not in population"),
                    }
                }

                if let Some(trigger) = trigger {
                    *edge = Hyperedge::form(key.members(), *interaction_type, self.weight_range, rng)?;
                    debug!(
                        interaction_type = %interaction_type,
                        members = key.members().len(),
                        trigger = %trigger,
                        "hyperedge reformed"
                    );
                    reformed.push(Reformation {
                        interaction_type: *interaction_type,
                        key: key.clone(),
                        trigger,
                    });
                }
            }
        }

        Ok(reformed)
    }

    /// Neighbor weights as seen by `node`: the weights of every hyperedge
    /// containing it, averaged where a neighbor shares several.
    pub fn weights_for(&self, node: NodeId) -> WeightLookup {
        let mut acc: HashMap<NodeId, (f64, u32)> = HashMap::new();
        for edge in self.iter().filter(|e| e.contains(&node)) {
            for (id, weight) in edge.weights() {
                let entry = acc.entry(*id).or_insert((0.0, 0));
                entry.0 += weight;
                entry.1 += 1;
            }
        }
        WeightLookup::new(
            acc.into_iter()
                .map(|(id, (sum, count))| (id, sum / count as f64))
                .collect(),
        )
    }

    pub fn get(&self, interaction_type: InteractionType, key: &HyperedgeKey) -> Option<&Hyperedge> {
        self.buckets.get(&interaction_type)?.get(key)
    }

    /// Every hyperedge, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Hyperedge> {
        self.buckets.values().flat_map(|bucket| bucket.values())
    }

    pub fn of_type(&self, interaction_type: InteractionType) -> impl Iterator<Item = &Hyperedge> {
        self.buckets
            .get(&interaction_type)
            .into_iter()
            .flat_map(|bucket| bucket.values())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
