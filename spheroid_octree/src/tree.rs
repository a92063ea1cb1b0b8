// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: lazy build, insertion, per-tick maintenance, aggregation.

use std::collections::VecDeque;

use glam::Vec3;
use log::{debug, trace, warn};

use crate::body::{Bodies, BodyKey};
use crate::config::OctreeConfig;
use crate::error::{OctreeError, Result};
use crate::types::{Octant, OctantMask, Region};

/// `life` value of a node that is not counting down.
pub const NOT_AGING: i32 = -1;

/// Identifier for a node in the tree.
///
/// Slot index plus generation, like [`BodyKey`]. A pruned node's id goes stale and
/// never aliases a node allocated later in the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: [Option<NodeId>; 8],
    active: OctantMask,
    region: Region,
    contained: Vec<BodyKey>,
    lifespan: u32,
    life: i32,
    built: bool,
}

/// What one maintenance pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Maintenance {
    /// Inactive bodies removed from the tree, in traversal order.
    pub evicted: Vec<BodyKey>,
    /// Bodies that moved and were re-homed.
    pub moved: usize,
    /// Empty branches detached.
    pub pruned: usize,
    /// Nodes rebuilt because a body escaped the root region.
    pub rebuilds: usize,
}

/// Octree over bodies held in a [`Bodies`] store.
///
/// Nodes live in an arena. Each node owns the membership of the bodies it holds and
/// its children; `parent` is a plain back-reference used only to walk toward the root.
pub struct Octree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    config: OctreeConfig,
    maintaining: bool,
    deferred_rebuilds: Vec<NodeId>,
}

impl core::fmt::Debug for Octree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Octree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.node_count())
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Octree {
    fn default() -> Self {
        Self::new(OctreeConfig::default())
    }
}

impl Octree {
    /// Create a tree whose root region is sized from the first bodies it builds from.
    pub fn new(config: OctreeConfig) -> Self {
        Self::with_region(Region::UNSET, config)
    }

    /// Create a tree with a fixed root region.
    pub fn with_region(region: Region, config: OctreeConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            config,
            maintaining: false,
            deferred_rebuilds: Vec::new(),
        };
        tree.root = tree.alloc(None, region, Vec::new());
        tree
    }

    /// Configuration in use.
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    // --- inspection ---

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether subdivision has been attempted for this node.
    pub fn is_built(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.built)
    }

    /// Region of a live node.
    pub fn region(&self, id: NodeId) -> Option<Region> {
        self.node(id).map(|n| n.region)
    }

    /// Parent of a live node; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Bodies held directly by a node. Empty for stale ids.
    pub fn contained(&self, id: NodeId) -> &[BodyKey] {
        self.node(id).map(|n| n.contained.as_slice()).unwrap_or(&[])
    }

    /// Presence mask of a node's children.
    pub fn active_children(&self, id: NodeId) -> OctantMask {
        self.node(id).map(|n| n.active).unwrap_or_default()
    }

    /// Child of a node in one octant.
    pub fn child(&self, id: NodeId, octant: Octant) -> Option<NodeId> {
        self.node(id)?.children[octant.index()]
    }

    /// Children of a node, in octant order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (Octant, NodeId)> + '_ {
        let node = self.node(id);
        Octant::ALL.into_iter().filter_map(move |o| {
            let n = node?;
            if !n.active.contains(o.mask()) {
                return None;
            }
            n.children[o.index()].map(|c| (o, c))
        })
    }

    /// Remaining life of a node: [`NOT_AGING`] unless it is an empty leaf counting down.
    pub fn life(&self, id: NodeId) -> Option<i32> {
        self.node(id).map(|n| n.life)
    }

    /// Current lifespan of a node.
    pub fn lifespan(&self, id: NodeId) -> Option<u32> {
        self.node(id).map(|n| n.lifespan)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Number of bodies held across all nodes.
    pub fn body_count(&self) -> usize {
        self.nodes.iter().flatten().map(|n| n.contained.len()).sum()
    }

    /// Distance from the root (the root has depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    /// Every `(node, body)` membership, depth first in octant order.
    pub fn owners(&self) -> Vec<(NodeId, BodyKey)> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |id, node| {
            out.extend(node.contained.iter().map(|k| (id, *k)));
        });
        out
    }

    /// The node currently holding `key`.
    pub fn locate(&self, key: BodyKey) -> Option<NodeId> {
        let mut found = None;
        self.walk(self.root, &mut |id, node| {
            if found.is_none() && node.contained.contains(&key) {
                found = Some(id);
            }
        });
        found
    }

    // --- construction ---

    /// Move pending bodies into the tree.
    ///
    /// An unbuilt root waits until at least two bodies are available, then takes the
    /// whole queue and builds. A built root inserts each pending body. Stale or
    /// inactive handles are dropped from the queue. Returns the number of bodies placed.
    pub fn ingest(
        &mut self,
        bodies: &mut Bodies,
        pending: &mut VecDeque<BodyKey>,
    ) -> Result<usize> {
        pending.retain(|k| bodies.get(*k).is_some_and(|b| b.active));
        if pending.is_empty() {
            return Ok(0);
        }
        let root = self.root;
        if !self.is_built(root) {
            let available = self.contained(root).len() + pending.len();
            if available < 2 {
                trace!("root unbuilt with {available} body; waiting for more");
                return Ok(0);
            }
            let count = pending.len();
            for key in pending.drain(..) {
                if let Some(body) = bodies.get_mut(key) {
                    body.settle();
                }
                if let Some(node) = self.node_mut(root) {
                    node.contained.push(key);
                }
            }
            debug!("building root from {available} bodies");
            self.build(bodies, root)?;
            return Ok(count);
        }
        let mut count = 0;
        while let Some(key) = pending.pop_front() {
            self.insert(bodies, key)?;
            count += 1;
        }
        Ok(count)
    }

    /// Subdivide a node from everything currently held in its subtree.
    ///
    /// Fewer than two bodies never subdivide. An unset region is first sized to the
    /// smallest power-of-two cube around the bodies, which fails with
    /// [`OctreeError::MissingBounds`] if one of them has no valid bounding sphere and with
    /// [`OctreeError::RegionOverflow`] if the cube does not fit in `f32`.
    pub fn build(&mut self, bodies: &Bodies, id: NodeId) -> Result<()> {
        self.collapse(id);
        self.build_node(bodies, id)
    }

    /// Insert a body starting at the root, at the shallowest node that can hold it.
    ///
    /// A second body forced into an unbuilt root builds it. `key` must not already be
    /// held by a node.
    pub fn insert(&mut self, bodies: &mut Bodies, key: BodyKey) -> Result<()> {
        debug_assert!(
            self.locate(key).is_none(),
            "{key:?} is already held by {:?}",
            self.locate(key)
        );
        bodies
            .get_mut(key)
            .ok_or(OctreeError::UnknownBody(key))?
            .settle();
        let root = self.root;
        if !self.is_built(root) && !self.contained(root).is_empty() {
            self.attach(root, key);
            return self.build(bodies, root);
        }
        self.insert_at(bodies, root, key)
    }

    fn build_node(&mut self, bodies: &Bodies, id: NodeId) -> Result<()> {
        let min_size = self.config.min_node_size;
        let epsilon = self.config.radius_epsilon;
        let max_contained = self.config.max_contained;

        let (regions, lists) = {
            let Some(node) = self.node_mut(id) else {
                return Ok(());
            };
            node.built = true;
            if node.contained.len() < 2 {
                return Ok(());
            }
            if node.region.is_unset() {
                let spheres = node
                    .contained
                    .iter()
                    .map(|&key| match bodies.get(key) {
                        Some(b) if b.bounding_sphere_is_valid() => Ok((b.position, b.radius())),
                        Some(_) => Err(OctreeError::MissingBounds(key)),
                        None => Err(OctreeError::UnknownBody(key)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                node.region =
                    Region::enclosing_cube(spheres).ok_or(OctreeError::RegionOverflow)?;
            }
            if node.region.is_at_most(min_size) {
                if node.contained.len() > max_contained {
                    debug!(
                        "node {id:?} at minimum size holds {} bodies",
                        node.contained.len()
                    );
                }
                return Ok(());
            }

            let regions = node.region.octants();
            let mut lists: [Vec<BodyKey>; 8] = Default::default();
            let mut kept = Vec::new();
            for key in core::mem::take(&mut node.contained) {
                let home = bodies
                    .get(key)
                    .and_then(|b| enclosing_octant(&regions, b.position, b.radius(), epsilon));
                match home {
                    Some(octant) => lists[octant.index()].push(key),
                    None => kept.push(key),
                }
            }
            node.contained = kept;
            (regions, lists)
        };

        for (octant, list) in Octant::ALL.into_iter().zip(lists) {
            if list.is_empty() {
                continue;
            }
            let child = self.alloc(Some(id), regions[octant.index()], list);
            self.link(id, octant, child);
            self.build_node(bodies, child)?;
        }
        trace!(
            "built {id:?}: {} kept, children {:?}",
            self.contained(id).len(),
            self.active_children(id)
        );
        Ok(())
    }

    fn insert_at(&mut self, bodies: &Bodies, id: NodeId, key: BodyKey) -> Result<()> {
        let body = bodies.get(key).ok_or(OctreeError::UnknownBody(key))?;
        let (center, radius) = (body.position, body.radius());
        let id = if self.is_alive(id) { id } else { self.root };
        let Some(node) = self.node(id) else {
            return Ok(());
        };

        if node.active.is_empty() && node.contained.len() <= 1 {
            self.attach(id, key);
            return Ok(());
        }
        if !node.region.is_unset() && node.region.is_at_most(self.config.min_node_size) {
            self.attach(id, key);
            return Ok(());
        }
        if !node.region.encloses_sphere(center, radius) {
            return self.rebuild_with(bodies, id, key);
        }
        if radius > self.config.radius_epsilon {
            let region = node.region;
            let children = node.children;
            for octant in Octant::ALL {
                let child_region = region.octant(octant);
                if !child_region.encloses_sphere(center, radius) {
                    continue;
                }
                return match children[octant.index()] {
                    Some(child) => self.insert_at(bodies, child, key),
                    None => {
                        let child = self.alloc(Some(id), child_region, vec![key]);
                        self.link(id, octant, child);
                        if let Some(c) = self.node_mut(child) {
                            c.built = true;
                        }
                        Ok(())
                    }
                };
            }
        }
        self.attach(id, key);
        Ok(())
    }

    fn rebuild_with(&mut self, bodies: &Bodies, id: NodeId, key: BodyKey) -> Result<()> {
        self.attach(id, key);
        if self.maintaining {
            // No node may be freed while the maintenance walk is running.
            if !self.deferred_rebuilds.contains(&id) {
                self.deferred_rebuilds.push(id);
            }
            return Ok(());
        }
        self.rebuild(bodies, id)
    }

    fn rebuild(&mut self, bodies: &Bodies, id: NodeId) -> Result<()> {
        self.collapse(id);
        if id == self.root
            && let Some(node) = self.node_mut(id)
        {
            node.region = Region::UNSET;
        }
        debug!(
            "rebuilding {id:?} from {} bodies after a containment violation",
            self.contained(id).len()
        );
        self.build_node(bodies, id)
    }

    // --- maintenance ---

    /// Run the per-tick maintenance pass over every built node.
    ///
    /// Ages empty leaves, evicts inactive bodies, re-homes bodies that moved, prunes
    /// dead branches. Does nothing until the root has been built.
    pub fn update(&mut self, bodies: &mut Bodies) -> Result<Maintenance> {
        let mut report = Maintenance::default();
        self.maintain(bodies, &mut report)?;
        Ok(report)
    }

    /// [`Octree::update`] into a caller-owned report.
    ///
    /// On error the report still lists what the pass did before failing. Evicted bodies
    /// are out of the tree either way and the caller owns freeing them.
    pub fn maintain(&mut self, bodies: &mut Bodies, report: &mut Maintenance) -> Result<()> {
        if !self.is_built(self.root) {
            return Ok(());
        }
        self.maintaining = true;
        let walked = self.update_node(bodies, self.root, report);
        self.maintaining = false;
        walked?;
        for id in core::mem::take(&mut self.deferred_rebuilds) {
            if self.is_alive(id) {
                self.rebuild(bodies, id)?;
                report.rebuilds += 1;
            }
        }
        Ok(())
    }

    fn update_node(
        &mut self,
        bodies: &mut Bodies,
        id: NodeId,
        report: &mut Maintenance,
    ) -> Result<()> {
        let cap = self.config.lifespan_cap;
        let mut movers = Vec::new();
        let (children, active) = {
            let Some(node) = self.node_mut(id) else {
                return Ok(());
            };

            if node.contained.is_empty() {
                if node.active.is_empty() {
                    if node.life == NOT_AGING {
                        node.life = i32::try_from(node.lifespan).unwrap_or(i32::MAX);
                    } else if node.life > 0 {
                        node.life -= 1;
                    }
                }
            } else if node.life != NOT_AGING {
                node.lifespan = node.lifespan.saturating_mul(2).min(cap);
                node.life = NOT_AGING;
            }

            let mut kept = Vec::with_capacity(node.contained.len());
            for key in core::mem::take(&mut node.contained) {
                match bodies.get_mut(key) {
                    None => warn!("dropping stale body {key:?} from {id:?}"),
                    Some(body) if !body.active => report.evicted.push(key),
                    Some(body) => {
                        if body.has_moved() {
                            body.settle();
                            movers.push(key);
                        }
                        kept.push(key);
                    }
                }
            }
            node.contained = kept;
            (node.children, node.active)
        };

        for octant in active.octants() {
            if let Some(child) = children[octant.index()] {
                self.update_node(bodies, child, report)?;
            }
        }

        for key in movers {
            let Some(body) = bodies.get(key) else {
                continue;
            };
            let (center, radius) = (body.position, body.radius());
            let Some(node) = self.node_mut(id) else {
                break;
            };
            let Some(at) = node.contained.iter().position(|k| *k == key) else {
                continue;
            };
            node.contained.remove(at);
            let target = self.ascend(id, center, radius);
            trace!("re-homing {key:?} from {id:?} via {target:?}");
            self.insert_at(bodies, target, key)?;
            report.moved += 1;
        }

        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let (children, active) = (node.children, node.active);
        for octant in active.octants() {
            let Some(child) = children[octant.index()] else {
                continue;
            };
            let Some(c) = self.node_mut(child) else {
                continue;
            };
            if c.life != 0 {
                continue;
            }
            if !c.contained.is_empty() || !c.active.is_empty() {
                c.life = NOT_AGING;
                continue;
            }
            self.free(child);
            if let Some(node) = self.node_mut(id) {
                node.children[octant.index()] = None;
                node.active.remove(octant.mask());
            }
            debug!("pruned {child:?} from {id:?}");
            report.pruned += 1;
        }
        Ok(())
    }

    /// Nearest node from `from` toward the root whose region encloses the sphere, or the root.
    fn ascend(&self, from: NodeId, center: Vec3, radius: f32) -> NodeId {
        let mut cur = from;
        while let Some(node) = self.node(cur) {
            if node.region.encloses_sphere(center, radius) {
                return cur;
            }
            match node.parent {
                Some(parent) => cur = parent,
                None => return cur,
            }
        }
        self.root
    }

    // --- aggregation ---

    /// Union of the bodies held by every node, depth first in octant order.
    ///
    /// Each body appears once. This is the candidate set handed to the narrow phase.
    pub fn potential_collisions(&self) -> Vec<BodyKey> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |_, node| out.extend_from_slice(&node.contained));
        out
    }

    /// Bodies held by `id` and by each of its ancestors, nearest first.
    pub fn collect(&self, id: NodeId) -> Vec<BodyKey> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(node) = cur.and_then(|c| self.node(c)) {
            out.extend_from_slice(&node.contained);
            cur = node.parent;
        }
        out
    }

    /// Pairs of bodies that share a node or sit on one ancestor chain.
    ///
    /// Bodies in disjoint sibling subtrees are separated by a region boundary and
    /// are not paired.
    pub fn candidate_pairs(&self) -> Vec<(BodyKey, BodyKey)> {
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.chain_pairs(self.root, &mut chain, &mut out);
        out
    }

    fn chain_pairs(
        &self,
        id: NodeId,
        chain: &mut Vec<BodyKey>,
        out: &mut Vec<(BodyKey, BodyKey)>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        for (i, &a) in node.contained.iter().enumerate() {
            out.extend(chain.iter().map(|&above| (above, a)));
            out.extend(node.contained[i + 1..].iter().map(|&b| (a, b)));
        }
        let mark = chain.len();
        chain.extend_from_slice(&node.contained);
        for (_, child) in self.children(id) {
            self.chain_pairs(child, chain, out);
        }
        chain.truncate(mark);
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn walk(&self, id: NodeId, visit: &mut impl FnMut(NodeId, &Node)) {
        let Some(node) = self.node(id) else {
            return;
        };
        visit(id, node);
        for (_, child) in self.children(id) {
            self.walk(child, visit);
        }
    }

    fn alloc(&mut self, parent: Option<NodeId>, region: Region, contained: Vec<BodyKey>) -> NodeId {
        let lifespan = self.config.initial_lifespan;
        let make = |generation| Node {
            generation,
            parent,
            children: [None; 8],
            active: OctantMask::empty(),
            region,
            contained,
            lifespan,
            life: NOT_AGING,
            built: false,
        };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(make(generation));
            NodeId::new(idx, generation)
        } else {
            self.nodes.push(Some(make(1)));
            self.generations.push(1);
            NodeId::new(self.nodes.len() - 1, 1)
        }
    }

    fn free(&mut self, id: NodeId) -> Option<Node> {
        self.node(id)?;
        let node = self.nodes[id.idx()].take();
        self.free_list.push(id.idx());
        node
    }

    fn link(&mut self, parent: NodeId, octant: Octant, child: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children[octant.index()] = Some(child);
            p.active.insert(octant.mask());
        }
    }

    /// Append a body to a node, reviving the node if it was counting down.
    fn attach(&mut self, id: NodeId, key: BodyKey) {
        let cap = self.config.lifespan_cap;
        if let Some(node) = self.node_mut(id) {
            node.contained.push(key);
            if node.life != NOT_AGING {
                node.lifespan = node.lifespan.saturating_mul(2).min(cap);
                node.life = NOT_AGING;
            }
        }
    }

    /// Free every descendant of `id` and hand their bodies to `id`.
    fn collapse(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => {
                node.active = OctantMask::empty();
                core::mem::take(&mut node.children)
            }
            None => return,
        };
        let mut lifted = Vec::new();
        for child in children.into_iter().flatten() {
            self.drain_subtree(child, &mut lifted);
        }
        if let Some(node) = self.node_mut(id) {
            node.contained.extend(lifted);
        }
    }

    fn drain_subtree(&mut self, id: NodeId, out: &mut Vec<BodyKey>) {
        let Some(node) = self.free(id) else {
            return;
        };
        out.extend(node.contained);
        for child in node.children.into_iter().flatten() {
            self.drain_subtree(child, out);
        }
    }
}

fn enclosing_octant(
    regions: &[Region; 8],
    center: Vec3,
    radius: f32,
    epsilon: f32,
) -> Option<Octant> {
    if radius <= epsilon {
        return None;
    }
    Octant::ALL
        .into_iter()
        .find(|o| regions[o.index()].encloses_sphere(center, radius))
}
