use std::collections::HashMap;

use bytes::Bytes;

use crate::constants::LIST_SERVICE_NAME;
use crate::constants::SET_SERVICE_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    pub fn service_name(&self) -> &'static str {
        match self {
            CollectionKind::List => LIST_SERVICE_NAME,
            CollectionKind::Set => SET_SERVICE_NAME,
        }
    }

    /// Maps a service name back to a collection kind. Any other service is
    /// not a collection.
    pub fn from_service_name(service_name: &str) -> Option<Self> {
        match service_name {
            LIST_SERVICE_NAME => Some(CollectionKind::List),
            SET_SERVICE_NAME => Some(CollectionKind::Set),
            _ => None,
        }
    }
}

/// Items of one named list or set, in insertion order.
#[derive(Debug, Clone)]
pub struct CollectionContainer {
    kind: CollectionKind,
    items: Vec<Bytes>,
}

impl CollectionContainer {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Appends `item`. A set refuses duplicates.
    pub fn add(
        &mut self,
        item: Bytes,
    ) -> bool {
        if self.kind == CollectionKind::Set && self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the first occurrence of `item`.
    pub fn remove(
        &mut self,
        item: &Bytes,
    ) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(
        &self,
        item: &Bytes,
    ) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Bytes] {
        &self.items
    }
}

/// Collections hosted by one partition.
#[derive(Debug, Default)]
pub struct CollectionStore {
    containers: HashMap<(CollectionKind, String), CollectionContainer>,
}

impl CollectionStore {
    pub fn get(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> Option<&CollectionContainer> {
        self.containers.get(&(kind, name.to_string()))
    }

    pub fn get_mut(
        &mut self,
        kind: CollectionKind,
        name: &str,
    ) -> Option<&mut CollectionContainer> {
        self.containers.get_mut(&(kind, name.to_string()))
    }

    pub fn get_or_create(
        &mut self,
        kind: CollectionKind,
        name: &str,
    ) -> &mut CollectionContainer {
        self.containers
            .entry((kind, name.to_string()))
            .or_insert_with(|| CollectionContainer::new(kind))
    }

    pub fn destroy(
        &mut self,
        kind: CollectionKind,
        name: &str,
    ) -> bool {
        self.containers.remove(&(kind, name.to_string())).is_some()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
