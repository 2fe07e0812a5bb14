use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;

use derivative::Derivative;
use fxhash::FxHashMap;
use log::debug;

use crate::gpu::{AnalyticLight, EmissiveTriangle, LightId};
use crate::EnvMap;

/// Registry of scene lights, keyed by caller-chosen handles.
///
/// Every modification marks the set as dirty, which makes the engine rebuild
/// its alias tables and drop reservoirs of the previous frame.
#[derive(Debug, Derivative)]
#[derivative(Default(bound = ""))]
pub struct LightSet<H>
where
    H: Clone + Debug + Eq + Hash,
{
    emissive: LightList<H, EmissiveTriangle>,
    analytic: LightList<H, AnalyticLight>,
    environment: Option<EnvMap>,
    is_dirty: bool,
}

impl<H> LightSet<H>
where
    H: Clone + Debug + Eq + Hash,
{
    /// Adds (or replaces) an emissive triangle.
    pub fn add_emissive(&mut self, handle: H, triangle: EmissiveTriangle) {
        debug!("Adding emissive triangle: {:?}", handle);

        self.emissive.add(handle, triangle);
        self.is_dirty = true;
    }

    pub fn remove_emissive(&mut self, handle: &H) {
        if self.emissive.remove(handle) {
            debug!("Removed emissive triangle: {:?}", handle);

            self.is_dirty = true;
        }
    }

    /// Adds (or replaces) a point or directional light.
    pub fn add_analytic(&mut self, handle: H, light: AnalyticLight) {
        debug!("Adding analytic light: {:?}", handle);

        self.analytic.add(handle, light);
        self.is_dirty = true;
    }

    pub fn remove_analytic(&mut self, handle: &H) {
        if self.analytic.remove(handle) {
            debug!("Removed analytic light: {:?}", handle);

            self.is_dirty = true;
        }
    }

    pub fn set_environment(&mut self, env: Option<EnvMap>) {
        debug!("Setting environment map: {}", env.is_some());

        self.environment = env;
        self.is_dirty = true;
    }

    pub fn emissive(&self) -> &[EmissiveTriangle] {
        self.emissive.items()
    }

    pub fn analytic(&self) -> &[AnalyticLight] {
        self.analytic.items()
    }

    pub fn environment(&self) -> Option<&EnvMap> {
        self.environment.as_ref()
    }

    /// Returns the id under which given emissive triangle is sampled; ids
    /// are dense and change when lights get removed.
    pub fn emissive_id(&self, handle: &H) -> Option<LightId> {
        self.emissive.id(handle)
    }

    pub fn analytic_id(&self, handle: &H) -> Option<LightId> {
        self.analytic.id(handle)
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.is_dirty = false;
    }
}

/// Dense list of lights with a handle → id index.
#[derive(Debug, Derivative)]
#[derivative(Default(bound = ""))]
struct LightList<H, T> {
    items: Vec<T>,
    index: FxHashMap<H, LightId>,
}

impl<H, T> LightList<H, T>
where
    H: Eq + Hash,
{
    fn add(&mut self, handle: H, item: T) {
        match self.index.entry(handle) {
            Entry::Occupied(entry) => {
                self.items[entry.get().get() as usize] = item;
            }

            Entry::Vacant(entry) => {
                entry.insert(LightId::new(self.items.len() as u32));
                self.items.push(item);
            }
        }
    }

    fn remove(&mut self, handle: &H) -> bool {
        let Some(id) = self.index.remove(handle) else {
            return false;
        };

        self.items.remove(id.get() as usize);

        for id2 in self.index.values_mut() {
            if id2.get() > id.get() {
                *id2 = LightId::new(id2.get() - 1);
            }
        }

        true
    }

    fn id(&self, handle: &H) -> Option<LightId> {
        self.index.get(handle).copied()
    }

    fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;

    fn point(x: f32) -> AnalyticLight {
        AnalyticLight::point(vec3(x, 0.0, 0.0), Vec3::ONE)
    }

    #[test]
    fn add_and_remove() {
        let mut lights = LightSet::<&str>::default();

        assert!(!lights.is_dirty());

        lights.add_analytic("a", point(1.0));
        lights.add_analytic("b", point(2.0));
        lights.add_analytic("c", point(3.0));

        assert!(lights.is_dirty());
        assert_eq!(3, lights.analytic().len());

        lights.mark_clean();
        lights.remove_analytic(&"a");

        assert!(lights.is_dirty());
        assert_eq!(2, lights.analytic().len());
        assert_eq!(None, lights.analytic_id(&"a"));
        assert_eq!(Some(LightId::new(0)), lights.analytic_id(&"b"));
        assert_eq!(Some(LightId::new(1)), lights.analytic_id(&"c"));
        assert_eq!(point(3.0), lights.analytic()[1]);
    }

    #[test]
    fn replace() {
        let mut lights = LightSet::<u32>::default();

        lights.add_analytic(1, point(1.0));
        lights.add_analytic(1, point(5.0));

        assert_eq!(&[point(5.0)], lights.analytic());
    }

    #[test]
    fn removing_unknown_light_keeps_set_clean() {
        let mut lights = LightSet::<u32>::default();

        lights.remove_emissive(&123);

        assert!(!lights.is_dirty());
    }
}
