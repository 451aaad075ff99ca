/// Borrowed (entity, component) views over a component store
///
/// A view is a snapshot of the store's dense arrays. The borrow it holds keeps the
/// store from being inserted into or erased from while the view is alive.

use std::iter::Zip;
use std::slice;

use super::Entity;

/// Read-only view over every entity that has a `T`.
#[derive(Debug)]
pub struct ComponentView<'a, T> {
    entities: &'a [Entity],
    components: &'a [T],
}

impl<'a, T> Clone for ComponentView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ComponentView<'a, T> {}

impl<'a, T> ComponentView<'a, T> {
    /// Build a view from two parallel slices.
    ///
    /// ## Panics
    /// Panics if the slices have different lengths.
    pub fn new(entities: &'a [Entity], components: &'a [T]) -> Self {
        assert_eq!(
            entities.len(),
            components.len(),
            "entity and component slices have different lengths"
        );
        Self { entities, components }
    }

    /// A view with nothing in it, for component types that were never stored.
    pub fn empty() -> Self {
        Self {
            entities: &[],
            components: &[],
        }
    }

    pub fn entities(&self) -> &'a [Entity] {
        self.entities
    }

    pub fn components(&self) -> &'a [T] {
        self.components
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> ViewIter<'a, T> {
        ViewIter {
            inner: self.entities.iter().zip(self.components.iter()),
        }
    }
}

impl<'a, T> IntoIterator for ComponentView<'a, T> {
    type Item = (Entity, &'a T);
    type IntoIter = ViewIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over a [`ComponentView`].
pub struct ViewIter<'a, T> {
    inner: Zip<slice::Iter<'a, Entity>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for ViewIter<'a, T> {
    type Item = (Entity, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&entity, component)| (entity, component))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for ViewIter<'a, T> {}

/// Mutable view: entity ids stay read-only, component values can be edited in place.
#[derive(Debug)]
pub struct ComponentViewMut<'a, T> {
    entities: &'a [Entity],
    components: &'a mut [T],
}

impl<'a, T> ComponentViewMut<'a, T> {
    /// ## Panics
    /// Panics if the slices have different lengths.
    pub fn new(entities: &'a [Entity], components: &'a mut [T]) -> Self {
        assert_eq!(
            entities.len(),
            components.len(),
            "entity and component slices have different lengths"
        );
        Self { entities, components }
    }

    pub fn entities(&self) -> &[Entity] {
        self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> ViewIter<'_, T> {
        ViewIter {
            inner: self.entities.iter().zip(self.components.iter()),
        }
    }

    pub fn iter_mut(&mut self) -> ViewIterMut<'_, T> {
        ViewIterMut {
            inner: self.entities.iter().zip(self.components.iter_mut()),
        }
    }
}

impl<'a, T> IntoIterator for ComponentViewMut<'a, T> {
    type Item = (Entity, &'a mut T);
    type IntoIter = ViewIterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        ViewIterMut {
            inner: self.entities.iter().zip(self.components.iter_mut()),
        }
    }
}

/// Forward iterator over a [`ComponentViewMut`].
pub struct ViewIterMut<'a, T> {
    inner: Zip<slice::Iter<'a, Entity>, slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for ViewIterMut<'a, T> {
    type Item = (Entity, &'a mut T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&entity, component)| (entity, component))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for ViewIterMut<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockstep_iteration() {
        let entities = [Entity::from_raw(4), Entity::from_raw(1)];
        let values = ["four", "one"];
        let view = ComponentView::new(&entities, &values);

        let pairs: Vec<_> = view.into_iter().collect();
        assert_eq!(pairs, vec![(Entity::from_raw(4), &"four"), (Entity::from_raw(1), &"one")]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_empty_view() {
        let view: ComponentView<'_, u8> = ComponentView::empty();
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_mismatched_slices_panic() {
        let entities = [Entity::from_raw(0)];
        let values: [u32; 0] = [];
        let _ = ComponentView::new(&entities, &values);
    }

    #[test]
    fn test_mut_view_edits_in_place() {
        let entities = [Entity::from_raw(0), Entity::from_raw(9)];
        let mut values = [1, 2];

        for (entity, value) in ComponentViewMut::new(&entities, &mut values) {
            *value += entity.id() as i32;
        }

        assert_eq!(values, [1, 11]);
    }
}
