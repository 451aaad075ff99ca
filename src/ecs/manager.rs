/// Entity manager: entity ids, names, and typed component access
///
/// The manager owns a [`ComponentRegistry`] and forwards every typed operation to the
/// store of the matching component type. Entity allocation goes through an atomic
/// counter, so loader threads can create entities through a shared reference while the
/// frame thread keeps exclusive (`&mut`) access for component mutation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use log::*;
use parking_lot::Mutex;

use super::registry::ComponentRegistry;
use super::view::{ComponentView, ComponentViewMut};
use super::{Component, EcsError, Entity};

pub struct EntityManager {
    counter: AtomicU32,
    names: Mutex<BTreeMap<Entity, String>>,
    components: ComponentRegistry,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
            names: Mutex::new(BTreeMap::new()),
            components: ComponentRegistry::new(),
        }
    }

    /// Allocate a new entity named `"Entity N"`.
    pub fn create_entity(&self) -> Entity {
        self.create_named_entity("")
    }

    /// Allocate a new entity with a display name. An empty name falls back to
    /// `"Entity N"`.
    ///
    /// ## Panics
    /// Panics once the id space is exhausted (ids are never recycled).
    pub fn create_named_entity(&self, name: impl Into<String>) -> Entity {
        // Saturates at the store sentinel, which is never handed out
        let Ok(id) = self
            .counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
        else {
            panic!("entity id space exhausted");
        };

        let entity = Entity::from_raw(id);
        let mut name = name.into();
        if name.is_empty() {
            name = format!("Entity {id}");
        }

        trace!("Created {entity} ({name})");
        self.names.lock().insert(entity, name);
        entity
    }

    /// Rename an existing entity. Returns false if the entity is unknown.
    pub fn set_entity_name(&self, entity: Entity, name: impl Into<String>) -> bool {
        match self.names.lock().get_mut(&entity) {
            Some(slot) => {
                *slot = name.into();
                true
            }
            None => false,
        }
    }

    pub fn entity_name(&self, entity: Entity) -> Option<String> {
        self.names.lock().get(&entity).cloned()
    }

    /// Snapshot of every entity and its name, ordered by id.
    pub fn entities(&self) -> Vec<(Entity, String)> {
        self.names
            .lock()
            .iter()
            .map(|(&entity, name)| (entity, name.clone()))
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.names.lock().len()
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components
            .store::<T>()
            .is_some_and(|store| store.contains(entity))
    }

    /// Attach `value` to `entity`, replacing (and returning) any previous `T`.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Option<T> {
        self.components.store_or_default::<T>().insert(entity, value)
    }

    /// Attach several components at once, e.g. `(TransformComponent { .. }, PlayerTag)`.
    pub fn add_components<B: ComponentBundle>(&mut self, entity: Entity, bundle: B) {
        bundle.insert_into(&mut self.components, entity);
    }

    /// Attach default-constructed components, e.g.
    /// `add_default_components::<(MoveComponent, RotateComponent)>(entity)`.
    pub fn add_default_components<B: ComponentBundle + Default>(&mut self, entity: Entity) {
        self.add_components(entity, B::default());
    }

    /// Returns false if `entity` had no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> bool {
        self.components
            .store_mut::<T>()
            .is_some_and(|store| store.erase(entity))
    }

    /// Detach every component from `entity`. The id stays allocated and is never
    /// handed out again. Returns how many components were removed.
    pub fn clear_components(&mut self, entity: Entity) -> usize {
        self.components.erase_all(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.components
            .store::<T>()
            .and_then(|store| store.get(entity))
            .ok_or_else(|| EcsError::missing::<T>(entity))
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.components
            .store_mut::<T>()
            .and_then(|store| store.get_mut(entity))
            .ok_or_else(|| EcsError::missing::<T>(entity))
    }

    /// Every entity that has a `T`, paired with its component.
    pub fn view<T: Component>(&self) -> ComponentView<'_, T> {
        match self.components.store::<T>() {
            Some(store) => store.view(),
            None => ComponentView::empty(),
        }
    }

    pub fn view_mut<T: Component>(&mut self) -> ComponentViewMut<'_, T> {
        self.components.store_or_default::<T>().view_mut()
    }

    /// Number of entities that have a `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.components.store::<T>().map_or(0, |store| store.len())
    }

    /// The single entity holding a `T`.
    ///
    /// Returns [`None`] when no entity or more than one entity has the component, so an
    /// ambiguous lookup (two active cameras, say) never silently picks one.
    pub fn get_only_entity<T: Component>(&self) -> Option<Entity> {
        match self.view::<T>().entities() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Names of every component type attached to `entity`, for debug listings.
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .components
            .stores()
            .filter(|store| store.contains_entity(entity))
            .map(|store| store.component_name())
            .collect();
        names.sort_unstable();
        names
    }
}

/// A tuple of components that can be attached in one call.
pub trait ComponentBundle {
    fn insert_into(self, registry: &mut ComponentRegistry, entity: Entity);
}

macro_rules! impl_component_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentBundle for ($($name,)+) {
            #[allow(non_snake_case)] // the type names double as binding names
            fn insert_into(self, registry: &mut ComponentRegistry, entity: Entity) {
                let ($($name,)+) = self;
                $( registry.store_or_default::<$name>().insert(entity, $name); )+
            }
        }
    };
}

impl_component_bundle!(A);
impl_component_bundle!(A, B);
impl_component_bundle!(A, B, C);
impl_component_bundle!(A, B, C, D);
impl_component_bundle!(A, B, C, D, E);
impl_component_bundle!(A, B, C, D, E, F);
impl_component_bundle!(A, B, C, D, E, F, G);
impl_component_bundle!(A, B, C, D, E, F, G, H);
