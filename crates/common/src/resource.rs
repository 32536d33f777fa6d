use serde::{Deserialize, Serialize};

use crate::types::MaterialClass;

/// Identifier of a resource kind, as used by the registry and by drop entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u16);

/// Value-type description of an item: a harvested material or a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub id: ResourceId,
    pub name: String,
    /// Uses left before breaking, `-1` for infinite.
    #[serde(default = "infinite_durability")]
    pub durability: i32,
    #[serde(default = "unit_attack")]
    pub attack: i32,
    #[serde(default)]
    pub effective_against: MaterialClass,
    #[serde(default)]
    pub placeable: bool,
    #[serde(default = "stackable_by_default")]
    pub stackable: bool,
    /// Material id placed into the grid when this resource is placed.
    #[serde(default)]
    pub places_material: Option<u8>,
}

fn infinite_durability() -> i32 {
    -1
}

fn unit_attack() -> i32 {
    1
}

fn stackable_by_default() -> bool {
    true
}

impl ResourceDescriptor {
    /// A plain, non-placeable descriptor with default stats.
    pub fn basic(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            durability: infinite_durability(),
            attack: unit_attack(),
            effective_against: MaterialClass::None,
            placeable: false,
            stackable: stackable_by_default(),
            places_material: None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.durability < 0
    }

    /// Whether two descriptors may share a stack. Only ids are compared.
    pub fn same_kind(&self, other: &ResourceDescriptor) -> bool {
        self.id == other.id
    }
}

/// Bounded, ordered pile of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStack {
    items: Vec<ResourceDescriptor>,
    capacity: usize,
}

impl ResourceStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[ResourceDescriptor] {
        &self.items
    }

    /// Most recently added item.
    pub fn top(&self) -> Option<&ResourceDescriptor> {
        self.items.last()
    }

    /// Append one item. Returns false and leaves the stack unchanged when full.
    pub fn push(&mut self, item: ResourceDescriptor) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Move every item of `other` onto this stack, or none of them if they don't fit.
    pub fn absorb(&mut self, other: &mut ResourceStack) -> bool {
        if self.items.len() + other.items.len() > self.capacity {
            return false;
        }
        self.items.append(&mut other.items);
        true
    }

    /// True when the two stacks may be combined: either is empty or their tops match.
    pub fn can_merge(&self, other: &ResourceStack) -> bool {
        match (self.top(), other.top()) {
            (Some(a), Some(b)) => a.same_kind(b),
            _ => true,
        }
    }

    /// Split off the first half (rounded down) into a new stack of the same capacity.
    pub fn take_half(&mut self) -> ResourceStack {
        let half = self.items.len() / 2;
        ResourceStack {
            items: self.items.drain(..half).collect(),
            capacity: self.capacity,
        }
    }

    /// Remove and return the first item.
    pub fn take_one(&mut self) -> Option<ResourceDescriptor> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Empty the stack, returning its items in order.
    pub fn drain(&mut self) -> Vec<ResourceDescriptor> {
        std::mem::take(&mut self.items)
    }
}
