/// Type-keyed collection of component stores
///
/// One [`ComponentStore`] per component type, created the first time the type is
/// inserted. The registry is an ordinary value: every world owns its own, so
/// independent worlds (and tests) never share component state.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::sparse_set::ComponentStore;
use super::{Component, Entity};

/// Object-safe face of a `ComponentStore<T>`, used where the component type is not
/// known statically.
pub trait ErasedStore: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn contains_entity(&self, entity: Entity) -> bool;
    fn erase_entity(&mut self, entity: Entity) -> bool;
    fn component_name(&self) -> &'static str;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn erase_entity(&mut self, entity: Entity) -> bool {
        self.erase(entity)
    }

    fn component_name(&self) -> &'static str {
        short_type_name::<T>()
    }
}

#[derive(Default)]
pub struct ComponentRegistry {
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for `T`, if any component of that type was ever inserted.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref())
    }

    pub fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut())
    }

    /// The store for `T`, creating an empty one on first access.
    pub fn store_or_default<T: Component>(&mut self) -> &mut ComponentStore<T> {
        self.stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStore::<T>::new()))
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| unreachable!("store registered under the wrong type id"))
    }

    /// Number of distinct component types with a store.
    pub fn type_count(&self) -> usize {
        self.stores.len()
    }

    /// Type-erased stores, in no particular order.
    pub fn stores(&self) -> impl Iterator<Item = &dyn ErasedStore> {
        self.stores.values().map(|store| store.as_ref())
    }

    /// Remove `entity` from every store. Returns how many components were dropped.
    pub fn erase_all(&mut self, entity: Entity) -> usize {
        self.stores
            .values_mut()
            .map(|store| store.erase_entity(entity))
            .filter(|&erased| erased)
            .count()
    }
}

/// `type_name` without the module path, for log and error messages.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    match full.find('<') {
        // Keep generic arguments intact, only trim the outer path
        Some(generic_start) => {
            let head = &full[..generic_start];
            let start = head.rfind("::").map_or(0, |i| i + 2);
            &full[start..]
        }
        None => full.rsplit("::").next().unwrap_or(full),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[test]
    fn test_store_created_on_demand() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.store::<Health>().is_none());

        registry.store_or_default::<Health>().insert(Entity::from_raw(0), Health(5));
        assert_eq!(registry.type_count(), 1);
        assert_eq!(
            registry.store::<Health>().and_then(|s| s.get(Entity::from_raw(0))),
            Some(&Health(5))
        );
    }

    #[test]
    fn test_stores_are_per_type() {
        let mut registry = ComponentRegistry::new();
        registry.store_or_default::<u32>().insert(Entity::from_raw(1), 1);
        registry.store_or_default::<f32>().insert(Entity::from_raw(1), 1.0);

        assert_eq!(registry.type_count(), 2);
        assert_eq!(registry.erase_all(Entity::from_raw(1)), 2);
        assert_eq!(registry.erase_all(Entity::from_raw(1)), 0);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Health>(), "Health");
        assert_eq!(short_type_name::<u32>(), "u32");
        assert!(short_type_name::<Vec<Health>>().starts_with("Vec<"));
    }
}
