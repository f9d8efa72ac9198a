use crate::{
    config::PhysicsConfig,
    hash_set::{hash_pair, HashSet, HashValue},
    space::{ShapeArena, ShapeHandle},
};
use glam::Vec2;
use log::debug;

#[derive(Copy, Clone, Debug)]
pub struct CollisionPair {
    pub a: ShapeHandle,
    pub b: ShapeHandle,
}

impl PartialEq for CollisionPair {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for CollisionPair {}

impl CollisionPair {
    pub fn new(a: ShapeHandle, b: ShapeHandle) -> Self {
        Self { a, b }
    }

    /// Puts the lower ordered shape first, ties broken by handle. `None` if either shape is
    /// not in `shapes`.
    pub fn ordered(shapes: &ShapeArena, a: ShapeHandle, b: ShapeHandle) -> Option<Self> {
        let key_a = (shapes.get(a)?.order(), a);
        let key_b = (shapes.get(b)?.order(), b);
        Some(if key_b < key_a {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        })
    }

    /// Same value for both orderings of the pair.
    pub fn hash(&self) -> HashValue {
        hash_pair(self.a.0 as HashValue, self.b.0 as HashValue)
    }
}

#[derive(Copy, Clone, Debug)]
struct PseudoShape {
    handle: ShapeHandle,
    value: f32,
    is_min: bool,
}

fn compare_sat(a: &PseudoShape, b: &PseudoShape) -> std::cmp::Ordering {
    // mins sort before maxs at the same value so touching bounds still overlap
    a.value
        .total_cmp(&b.value)
        .then_with(|| b.is_min.cmp(&a.is_min))
}

fn sort_shapes_bounds(shapes: &ShapeArena) -> Vec<PseudoShape> {
    let mut sorted_shapes = Vec::with_capacity(shapes.len() * 2);

    let axis = Vec2::ONE.normalize();
    for (handle, shape) in shapes.iter() {
        let bounds = shape.bb();
        if bounds.is_empty() {
            continue;
        }

        sorted_shapes.push(PseudoShape {
            handle,
            value: axis.dot(bounds.mins),
            is_min: true,
        });
        sorted_shapes.push(PseudoShape {
            handle,
            value: axis.dot(bounds.maxs),
            is_min: false,
        });
    }

    sorted_shapes.sort_unstable_by(compare_sat);

    sorted_shapes
}

fn accept_pair(shapes: &ShapeArena, a: ShapeHandle, b: ShapeHandle) -> Option<CollisionPair> {
    let shape_a = shapes.get(a)?;
    let shape_b = shapes.get(b)?;

    if shape_a.body() == shape_b.body()
        || shape_a.filter.reject(&shape_b.filter)
        || !shape_a.bb().intersects(&shape_b.bb())
    {
        return None;
    }

    CollisionPair::ordered(shapes, a, b)
}

fn build_pairs(shapes: &ShapeArena, sorted_shapes: &[PseudoShape]) -> Vec<CollisionPair> {
    let mut collision_pairs = Vec::new();

    for (i, a) in sorted_shapes.iter().enumerate() {
        if !a.is_min {
            continue;
        }

        for b in &sorted_shapes[i + 1..] {
            // if we've hit the end of the a element then we're done creating pairs with a
            if b.handle == a.handle {
                break;
            }

            if !b.is_min {
                continue;
            }

            if let Some(pair) = accept_pair(shapes, a.handle, b.handle) {
                collision_pairs.push(pair);
            }
        }
    }

    collision_pairs
}

/// Pairs of shapes whose cached bounds overlap and which are allowed to collide. Bounds are
/// used as cached, call `ShapeArena::cache_bbs` first.
///
/// A simple feeder for `PairCache` over a `ShapeArena`. It is not a spatial index; engines
/// with their own spatial index should hand its pairs to `PairCache::step` directly.
pub fn candidate_pairs(shapes: &ShapeArena) -> Vec<CollisionPair> {
    let sorted_shapes = sort_shapes_bounds(shapes);
    build_pairs(shapes, &sorted_shapes)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CachedPair {
    pub pair: CollisionPair,
    /// Last step the pair was reported by the broadphase.
    pub stamp: u64,
}

type PairEql = fn(&CollisionPair, &CachedPair) -> bool;

fn pair_eql(pair: &CollisionPair, cached: &CachedPair) -> bool {
    *pair == cached.pair
}

/// Remembers collision pairs across steps until they go unseen for longer than the
/// configured persistence.
pub struct PairCache {
    pairs: HashSet<CollisionPair, CachedPair, PairEql>,
    stamp: u64,
    persistence: u64,
}

impl PairCache {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            pairs: HashSet::with_config(pair_eql as PairEql, config),
            stamp: 0,
            persistence: config.collision_persistence,
        }
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Advances the step counter, records `pairs` as seen and prunes stale pairs. Returns the
    /// number of pruned pairs.
    pub fn step(&mut self, pairs: &[CollisionPair]) -> usize {
        self.stamp += 1;
        let stamp = self.stamp;

        for pair in pairs {
            let cached = self
                .pairs
                .insert_with(pair.hash(), pair, stamp, |&pair, stamp| CachedPair {
                    pair,
                    stamp,
                });
            cached.stamp = stamp;
        }

        let persistence = self.persistence;
        let pruned = self
            .pairs
            .filter(|cached| stamp - cached.stamp <= persistence);
        if pruned > 0 {
            debug!("pruned {} stale collision pairs at step {}", pruned, stamp);
        }
        pruned
    }

    pub fn find(&self, pair: &CollisionPair) -> Option<&CachedPair> {
        self.pairs.find(pair.hash(), pair)
    }

    pub fn contains(&self, pair: &CollisionPair) -> bool {
        self.pairs.contains(pair.hash(), pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.count()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedPair> + '_ {
        self.pairs.iter()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}
