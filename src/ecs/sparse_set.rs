/// Sparse-set storage for a single component type
///
/// - `sparse[entity]` -> index into the dense arrays, or `SENTINEL` when absent
/// - `dense`          -> packed component values, no gaps
/// - `entities`       -> owner of each dense slot (`entities[i]` owns `dense[i]`)
///
/// Removal swaps the last element into the freed slot, so dense positions are not
/// stable across mutation. Always re-resolve through the entity id.

use super::view::{ComponentView, ComponentViewMut};
use super::Entity;

/// Marks a sparse slot with no component.
pub const SENTINEL: u32 = u32::MAX;

pub struct ComponentStore<T> {
    sparse: Vec<u32>,
    dense: Vec<T>,
    entities: Vec<Entity>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Insert or overwrite the component for `entity`.
    ///
    /// Returns the previous value when the entity already had one. The sparse array
    /// grows on demand up to `entity + 1`.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        let id = entity.id() as usize;
        assert!(entity.id() != SENTINEL, "entity id u32::MAX is reserved as sentinel");

        if id >= self.sparse.len() {
            self.sparse.resize(id + 1, SENTINEL);
        }

        match self.sparse[id] {
            SENTINEL => {
                self.sparse[id] = self.dense.len() as u32;
                self.dense.push(value);
                self.entities.push(entity);
                None
            }
            index => Some(std::mem::replace(&mut self.dense[index as usize], value)),
        }
    }

    /// Remove and return the component for `entity`, if present.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.dense_index(entity)?;
        let last = self.dense.len() - 1;

        let value = self.dense.swap_remove(index);
        self.entities.swap_remove(index);

        // The former last element now lives at `index`
        if index != last {
            let moved = self.entities[index];
            self.sparse[moved.id() as usize] = index as u32;
        }

        self.sparse[entity.id() as usize] = SENTINEL;
        Some(value)
    }

    /// Remove the component for `entity`. Returns false (and changes nothing) when the
    /// entity has no component in this store.
    pub fn erase(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Position of the entity's component in the dense arrays.
    #[inline]
    pub fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity.id() as usize) {
            Some(&index) if index != SENTINEL => Some(index as usize),
            _ => None,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.dense_index(entity)?;
        Some(&self.dense[index])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        Some(&mut self.dense[index])
    }

    /// Owning entities, parallel to [`Self::components`].
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    pub fn view(&self) -> ComponentView<'_, T> {
        ComponentView::new(&self.entities, &self.dense)
    }

    pub fn view_mut(&mut self) -> ComponentViewMut<'_, T> {
        ComponentViewMut::new(&self.entities, &mut self.dense)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Drop every component. The sparse array keeps its length.
    pub fn clear(&mut self) {
        self.sparse.fill(SENTINEL);
        self.dense.clear();
        self.entities.clear();
    }
}
