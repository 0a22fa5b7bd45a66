use tracing::warn;

use crate::object::{ObjectId, ObjectPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Flat effects lying on the terrain.
    Surface,
    Ground,
    Air,
    /// Projectiles and animations above everything on the ground.
    Top,
}

impl LayerKind {
    pub const COUNT: usize = 4;

    /// Altitude order used by the frame renderer.
    pub const DRAW_ORDER: [LayerKind; 4] = [
        LayerKind::Surface,
        LayerKind::Ground,
        LayerKind::Top,
        LayerKind::Air,
    ];

    const fn index(self) -> usize {
        match self {
            LayerKind::Surface => 0,
            LayerKind::Ground => 1,
            LayerKind::Air => 2,
            LayerKind::Top => 3,
        }
    }
}

/// One ordered object list.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    objects: Vec<ObjectId>,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ObjectId> {
        self.objects.get(index).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.objects.iter().copied()
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.objects
    }

    fn push(&mut self, id: ObjectId) {
        self.objects.push(id);
    }

    /// Inserts ahead of the first object that sorts after it.
    fn sorted_insert(&mut self, id: ObjectId, objects: &ObjectPool) {
        let Some(key) = objects.get(id).map(|object| object.sort_y()) else {
            return;
        };
        let position = self
            .objects
            .iter()
            .position(|other| objects.get(*other).map(|o| o.sort_y() > key).unwrap_or(false))
            .unwrap_or(self.objects.len());
        self.objects.insert(position, id);
    }

    fn remove(&mut self, id: ObjectId) -> bool {
        match self.objects.iter().position(|other| *other == id) {
            Some(index) => {
                self.objects.remove(index);
                true
            }
            None => false,
        }
    }

    /// One bubble pass; objects drift toward order as they move.
    fn sort_pass(&mut self, objects: &ObjectPool) {
        let key = |id: ObjectId| objects.get(id).map(|object| object.sort_y()).unwrap_or(i32::MAX);
        for index in 1..self.objects.len() {
            if key(self.objects[index - 1]) > key(self.objects[index]) {
                self.objects.swap(index - 1, index);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layers {
    layers: [Layer; LayerKind::COUNT],
}

impl Layers {
    pub fn layer(&self, kind: LayerKind) -> &Layer {
        &self.layers[kind.index()]
    }

    /// Adds an object. The ground layer stays ordered by sort key.
    pub fn submit(&mut self, id: ObjectId, kind: LayerKind, objects: &ObjectPool) {
        if !objects.contains(id) {
            return;
        }
        let layer = &mut self.layers[kind.index()];
        debug_assert!(!layer.contains(id), "object {id:?} submitted twice");
        if kind == LayerKind::Ground {
            layer.sorted_insert(id, objects);
        } else {
            layer.push(id);
        }
    }

    /// Removing an object that is not active or not in the layer is a
    /// caller bug.
    pub fn remove(&mut self, id: ObjectId, kind: LayerKind, objects: &ObjectPool) {
        let active = objects.get(id).map(|object| object.is_active()).unwrap_or(false);
        debug_assert!(active, "removing inactive object {id:?}");
        if !active {
            warn!(object = id.0, layer = ?kind, "layer_remove_inactive_object");
            return;
        }
        let removed = self.layers[kind.index()].remove(id);
        debug_assert!(removed, "object {id:?} not in layer {kind:?}");
        if !removed {
            warn!(object = id.0, layer = ?kind, "layer_remove_missing_object");
        }
    }

    /// Drops an object from every layer without the activity check; used
    /// when objects are destroyed.
    pub fn purge(&mut self, id: ObjectId) {
        for layer in &mut self.layers {
            layer.remove(id);
        }
    }

    pub fn count(&self, kind: LayerKind) -> usize {
        self.layer(kind).len()
    }

    pub fn sort_ground(&mut self, objects: &ObjectPool) {
        self.layers[LayerKind::Ground.index()].sort_pass(objects);
    }

    pub fn layer_of(&self, id: ObjectId) -> Option<LayerKind> {
        LayerKind::DRAW_ORDER
            .into_iter()
            .find(|kind| self.layer(*kind).contains(id))
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.objects.clear();
        }
    }
}
