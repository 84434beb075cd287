//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of boxes over shared objects. Each level sorts its objects
//! by the minimum of their boxes along the longest axis and splits in half.

use std::cmp::Ordering;
use std::sync::Arc;

use prism_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::hittable::{HitRecord, Hittable, HittableList};

/// Interior BVH node. Leaves are the scene objects themselves.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`. The slice itself is not reordered.
    pub fn new(objects: &[Arc<dyn Hittable>]) -> BuildResult<Self> {
        if objects.is_empty() {
            return Err(BuildError::EmptyBvh);
        }

        let mut objects = objects.to_vec();
        let node = Self::build(&mut objects);

        log::debug!(
            "Built BVH over {} objects, bounds {:?} .. {:?}",
            objects.len(),
            node.bbox.min(),
            node.bbox.max()
        );

        Ok(node)
    }

    /// Build a BVH over the contents of a list.
    pub fn from_list(list: &HittableList) -> BuildResult<Self> {
        Self::new(list.objects())
    }

    /// Recursive median split. `objects` is never empty.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, object| Aabb::surrounding(&acc, &object.bounding_box()));

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            _ => {
                let axis = bbox.longest_axis();
                objects.sort_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let (lower, upper) = objects.split_at_mut(objects.len() / 2);
                (Arc::new(Self::build(lower)), Arc::new(Self::build(upper)))
            }
        };

        Self { left, right, bbox }
    }
}

fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.total_cmp(&b_min)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to closest hit
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
