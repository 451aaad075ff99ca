/// Entity-component storage
///
/// This module provides:
/// - [`ComponentStore`]: sparse-set storage for one component type
/// - [`ComponentView`] / [`ComponentViewMut`]: (entity, component) iteration
/// - [`EntityManager`]: entity ids, names, and typed access to the stores
/// - Component definitions used by the engine systems
///
/// Component stores are single-threaded: mutate them from the frame thread only.
/// Entity ids can be allocated from any thread.

pub mod components;
pub mod manager;
pub mod registry;
pub mod sparse_set;
pub mod view;

pub use manager::{ComponentBundle, EntityManager};
pub use registry::ComponentRegistry;
pub use sparse_set::ComponentStore;
pub use view::{ComponentView, ComponentViewMut};

use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Opaque entity identifier. Ids come from a monotonic counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Wrap a raw id. Mostly useful in tests; live entities come from
    /// [`EntityManager::create_entity`].
    #[inline]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity #{}", self.0)
    }
}

/// Anything storable as a component. Stores are shared with loader threads through the
/// manager, hence `Send + Sync`.
pub trait Component: Any + Send + Sync {}

impl<T: Any + Send + Sync> Component for T {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("{entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
}

impl EcsError {
    pub fn missing<T: Component>(entity: Entity) -> Self {
        Self::MissingComponent {
            entity,
            component: registry::short_type_name::<T>(),
        }
    }
}
