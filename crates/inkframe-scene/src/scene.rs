//! Layer arena, tree structure and event bubbling.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use inkframe_core::{scale_about, set_offset, set_scale, Bounds, Point, Rgba, SceneError, SceneResult};
use slotmap::SlotMap;

use crate::drawer::Drawer;
use crate::events::{LayerEvent, LayerEventKind, LayerHandler, ListenerId};
use crate::identity::{Identity, IdentityCodec, IdentityTable};
use crate::image_cache::ImageCache;
use crate::layer::{ImageOutcome, Layer, LayerBuilder, LayerId, LayerKind, LayerProps};
use crate::text::{FontMeasure, TextLayout, TextMeasure, TextStyle};

struct ListenerEntry {
    id: ListenerId,
    kind: LayerEventKind,
    handler: LayerHandler,
}

fn not_found(id: LayerId) -> SceneError {
    SceneError::LayerNotFound {
        layer: format!("{id:?}"),
    }
}

fn not_a_line(id: LayerId) -> SceneError {
    SceneError::NotALineLayer {
        layer: format!("{id:?}"),
    }
}

/// Owns every layer, its identity and its listeners.
pub struct Scene {
    layers: SlotMap<LayerId, Layer>,
    identities: IdentityTable<LayerId>,
    listeners: HashMap<LayerId, Vec<ListenerEntry>>,
    next_listener: u64,
    measure: Box<dyn TextMeasure>,
    measure_generation: u64,
    images: &'static ImageCache,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(IdentityCodec::default())
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("layers", &self.layers.len())
            .field("identities", &self.identities.live_count())
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl Scene {
    pub fn new(codec: IdentityCodec) -> Self {
        Self {
            layers: SlotMap::with_key(),
            identities: IdentityTable::new(codec),
            listeners: HashMap::new(),
            next_listener: 0,
            measure: Box::new(FontMeasure),
            measure_generation: 0,
            images: ImageCache::global(),
        }
    }

    /// Uses `cache` instead of the process-wide image cache.
    pub fn with_image_cache(mut self, cache: &'static ImageCache) -> Self {
        self.images = cache;
        self
    }

    /// Replaces the text measurer; every text layout is recomputed.
    pub fn set_measure(&mut self, measure: impl TextMeasure + 'static) {
        self.measure = Box::new(measure);
        self.measure_generation += 1;
    }

    /// Adds a detached layer and allocates its identity.
    pub fn insert(&mut self, builder: LayerBuilder) -> SceneResult<LayerId> {
        if let LayerKind::Text(text) = &builder.kind {
            text.style().validate()?;
        }
        let LayerBuilder {
            props,
            tags,
            kind,
            drawer,
        } = builder;
        let name = kind.name();
        let hit_drawer = Drawer::identity(Rgba::BLACK, drawer.stroke_width);
        let id = self.layers.insert(Layer {
            identity: Identity::NONE,
            parent: None,
            props,
            tags,
            kind,
            drawer,
            hit_drawer,
        });

        let identity = match self.identities.allocate(id) {
            Ok(identity) => identity,
            Err(e) => {
                self.layers.remove(id);
                return Err(e);
            }
        };
        if let Some(layer) = self.layers.get_mut(id) {
            layer.identity = identity;
            layer.hit_drawer = Drawer::identity(identity.color(), layer.drawer.stroke_width);
        }
        self.refresh_layer(id);
        tracing::trace!("Inserted {} layer {:?} as {}", name, id, identity.hex());
        Ok(id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn layer(&self, id: LayerId) -> SceneResult<&Layer> {
        self.layers.get(id).ok_or_else(|| not_found(id))
    }

    fn layer_mut(&mut self, id: LayerId) -> SceneResult<&mut Layer> {
        self.layers.get_mut(id).ok_or_else(|| not_found(id))
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys()
    }

    // --- identity -------------------------------------------------------

    pub fn identity(&self, id: LayerId) -> SceneResult<Identity> {
        Ok(self.layer(id)?.identity)
    }

    /// Layer owning a 24-bit identity value sampled from the hit surface.
    pub fn lookup_identity(&self, value: u32) -> Option<LayerId> {
        self.identities
            .lookup(value)
            .filter(|id| self.layers.contains_key(*id))
    }

    pub fn identity_count(&self) -> usize {
        self.identities.live_count()
    }

    pub fn codec(&self) -> IdentityCodec {
        self.identities.codec()
    }

    // --- tree -----------------------------------------------------------

    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.layers.get(id).and_then(|l| l.parent)
    }

    pub fn children(&self, id: LayerId) -> &[LayerId] {
        self.layers.get(id).map(|l| l.children()).unwrap_or(&[])
    }

    /// Parent chain, nearest first.
    pub fn ancestors(&self, id: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn is_ancestor(&self, ancestor: LayerId, id: LayerId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Appends `child` to the top of `parent`. A child already inside
    /// `parent` moves to the top; one inside another container is detached
    /// from it first.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) -> SceneResult<()> {
        if !self.layer(parent)?.is_container() {
            return Err(SceneError::NotAContainer {
                layer: format!("{parent:?}"),
            });
        }
        let previous = self.layer(child)?.parent;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle {
                parent: format!("{parent:?}"),
                child: format!("{child:?}"),
            });
        }

        if let Some(old) = previous.filter(|&old| old != parent) {
            self.unlink(old, child);
        }
        if let Some(children) = self.layers.get_mut(parent).and_then(|l| l.kind.children_mut()) {
            children.retain(|&c| c != child);
            children.push(child);
        }
        if let Some(layer) = self.layers.get_mut(child) {
            layer.parent = Some(parent);
        }
        Ok(())
    }

    pub fn add_children(&mut self, parent: LayerId, children: &[LayerId]) -> SceneResult<()> {
        children
            .iter()
            .try_for_each(|&child| self.add_child(parent, child))
    }

    pub fn remove_child(&mut self, parent: LayerId, child: LayerId) -> SceneResult<()> {
        if !self.layer(parent)?.is_container() {
            return Err(SceneError::NotAContainer {
                layer: format!("{parent:?}"),
            });
        }
        self.unlink(parent, child);
        if let Some(layer) = self.layers.get_mut(child).filter(|l| l.parent == Some(parent)) {
            layer.parent = None;
        }
        Ok(())
    }

    pub fn remove_all_children(&mut self, parent: LayerId) -> SceneResult<()> {
        let children = match self.layer_mut(parent)?.kind.children_mut() {
            Some(children) => std::mem::take(children),
            None => {
                return Err(SceneError::NotAContainer {
                    layer: format!("{parent:?}"),
                })
            }
        };
        for child in children {
            if let Some(layer) = self.layers.get_mut(child) {
                layer.parent = None;
            }
        }
        Ok(())
    }

    fn unlink(&mut self, parent: LayerId, child: LayerId) {
        if let Some(children) = self.layers.get_mut(parent).and_then(|l| l.kind.children_mut()) {
            children.retain(|&c| c != child);
        }
    }

    /// Moves the layer above its siblings.
    pub fn bring_to_front(&mut self, id: LayerId) -> SceneResult<()> {
        self.reorder(id, |children, id| children.push(id))
    }

    /// Moves the layer below its siblings.
    pub fn bring_to_back(&mut self, id: LayerId) -> SceneResult<()> {
        self.reorder(id, |children, id| children.insert(0, id))
    }

    fn reorder(&mut self, id: LayerId, place: impl FnOnce(&mut Vec<LayerId>, LayerId)) -> SceneResult<()> {
        let Some(parent) = self.layer(id)?.parent else {
            return Ok(());
        };
        if let Some(children) = self.layers.get_mut(parent).and_then(|l| l.kind.children_mut()) {
            children.retain(|&c| c != id);
            place(children, id);
        }
        Ok(())
    }

    /// Detaches the layer, then frees it and all its descendants together
    /// with their listeners and identities.
    pub fn destroy(&mut self, id: LayerId) -> SceneResult<()> {
        if let Some(parent) = self.layer(id)?.parent {
            self.unlink(parent, id);
        }
        let mut pending = vec![id];
        let mut freed = 0usize;
        while let Some(current) = pending.pop() {
            if let Some(layer) = self.layers.remove(current) {
                pending.extend_from_slice(layer.children());
                self.identities.release(layer.identity);
                self.listeners.remove(&current);
                freed += 1;
            }
        }
        tracing::debug!("Destroyed {:?} ({} layers freed)", id, freed);
        Ok(())
    }

    // --- geometry -------------------------------------------------------

    /// Local bounds; the union of the children's bounds for groups.
    pub fn bounds(&self, id: LayerId) -> SceneResult<Bounds> {
        let layer = self.layer(id)?;
        Ok(match &layer.kind {
            LayerKind::Group(children) => children
                .iter()
                .filter_map(|&child| self.bounds(child).ok())
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default(),
            _ => layer.props.bounds(),
        })
    }

    pub fn x(&self, id: LayerId) -> SceneResult<f32> {
        let layer = self.layer(id)?;
        if layer.is_group() {
            return Ok(self.bounds(id)?.left);
        }
        Ok(layer.props.x)
    }

    pub fn y(&self, id: LayerId) -> SceneResult<f32> {
        let layer = self.layer(id)?;
        if layer.is_group() {
            return Ok(self.bounds(id)?.top);
        }
        Ok(layer.props.y)
    }

    pub fn width(&self, id: LayerId) -> SceneResult<f32> {
        let layer = self.layer(id)?;
        if layer.is_group() {
            return Ok(self.bounds(id)?.width());
        }
        Ok(layer.props.width)
    }

    pub fn height(&self, id: LayerId) -> SceneResult<f32> {
        let layer = self.layer(id)?;
        if layer.is_group() {
            return Ok(self.bounds(id)?.height());
        }
        Ok(layer.props.height)
    }

    pub fn position(&self, id: LayerId) -> SceneResult<Point> {
        Ok(Point::new(self.x(id)?, self.y(id)?))
    }

    pub fn props(&self, id: LayerId) -> SceneResult<LayerProps> {
        let layer = self.layer(id)?;
        if !layer.is_group() {
            return Ok(layer.props);
        }
        let bounds = self.bounds(id)?;
        Ok(LayerProps {
            x: bounds.left,
            y: bounds.top,
            width: bounds.width(),
            height: bounds.height(),
            ..layer.props
        })
    }

    /// Bounds in root space: own scale about the layer center, then each
    /// non-group ancestor's offset and scale about its center.
    pub fn client_bound_rect(&self, id: LayerId) -> SceneResult<Bounds> {
        let layer = self.layer(id)?;
        let mut bounds = set_scale(self.bounds(id)?, layer.props.scale);
        for ancestor in self.ancestors(id) {
            let Some(parent) = self.layers.get(ancestor) else {
                break;
            };
            if parent.is_group() {
                continue;
            }
            let p = parent.props;
            bounds = set_offset(bounds, Point::new(p.x, p.y));
            bounds = scale_about(
                bounds,
                Point::new(p.x + p.width / 2.0, p.y + p.height / 2.0),
                p.scale,
            );
        }
        Ok(bounds)
    }

    /// Converts a root-space delta into the layer's local space.
    pub fn resolve_parent_transform(&self, id: LayerId, dx: f32, dy: f32) -> SceneResult<Point> {
        self.layer(id)?;
        let mut delta = Point::new(dx, dy);
        for ancestor in self.ancestors(id) {
            let Some(parent) = self.layers.get(ancestor) else {
                break;
            };
            delta = delta.scaled(1.0 / parent.props.scale).rotated(-parent.props.rotate);
        }
        Ok(delta)
    }

    // --- mutation -------------------------------------------------------

    pub fn set_x(&mut self, id: LayerId, x: f32) -> SceneResult<()> {
        let dx = x - self.x(id)?;
        self.translate(id, dx, 0.0)
    }

    pub fn set_y(&mut self, id: LayerId, y: f32) -> SceneResult<()> {
        let dy = y - self.y(id)?;
        self.translate(id, 0.0, dy)
    }

    pub fn set_position(&mut self, id: LayerId, x: f32, y: f32) -> SceneResult<()> {
        let current = self.position(id)?;
        self.translate(id, x - current.x, y - current.y)
    }

    /// Moves the layer; groups move every child.
    pub fn translate(&mut self, id: LayerId, dx: f32, dy: f32) -> SceneResult<()> {
        let layer = self.layer_mut(id)?;
        if let LayerKind::Group(children) = &layer.kind {
            let children = children.clone();
            return children
                .into_iter()
                .try_for_each(|child| self.translate(child, dx, dy));
        }
        layer.props.x += dx;
        layer.props.y += dy;
        Ok(())
    }

    fn non_group_mut(&mut self, id: LayerId, property: &'static str) -> SceneResult<&mut Layer> {
        let layer = self.layer_mut(id)?;
        if layer.is_group() {
            return Err(SceneError::IllegalGroupMutation { property });
        }
        Ok(layer)
    }

    /// Text layers take the width as their wrap width.
    pub fn set_width(&mut self, id: LayerId, width: f32) -> SceneResult<()> {
        let layer = self.non_group_mut(id, "width")?;
        match &mut layer.kind {
            LayerKind::Text(text) => {
                let mut style = text.style().clone();
                style.max_width = Some(width);
                text.set_style(style);
            }
            _ => layer.props.width = width,
        }
        Ok(())
    }

    pub fn set_height(&mut self, id: LayerId, height: f32) -> SceneResult<()> {
        self.non_group_mut(id, "height")?.props.height = height;
        Ok(())
    }

    pub fn set_size(&mut self, id: LayerId, width: f32, height: f32) -> SceneResult<()> {
        self.set_width(id, width)?;
        self.set_height(id, height)
    }

    pub fn scale(&self, id: LayerId) -> SceneResult<f32> {
        Ok(self.layer(id)?.props.scale)
    }

    pub fn set_scale(&mut self, id: LayerId, scale: f32) -> SceneResult<()> {
        self.non_group_mut(id, "scale")?.props.scale = scale;
        Ok(())
    }

    pub fn rotate(&self, id: LayerId) -> SceneResult<f32> {
        Ok(self.layer(id)?.props.rotate)
    }

    /// Rotation in radians.
    pub fn set_rotate(&mut self, id: LayerId, radians: f32) -> SceneResult<()> {
        self.non_group_mut(id, "rotate")?.props.rotate = radians;
        Ok(())
    }

    pub fn opacity(&self, id: LayerId) -> SceneResult<f32> {
        Ok(self.layer(id)?.props.opacity)
    }

    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) -> SceneResult<()> {
        self.layer_mut(id)?.props.opacity = opacity;
        Ok(())
    }

    pub fn is_visible(&self, id: LayerId) -> SceneResult<bool> {
        Ok(self.layer(id)?.props.visible)
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> SceneResult<()> {
        self.layer_mut(id)?.props.visible = visible;
        Ok(())
    }

    /// End points of a line or arrow.
    pub fn line_points(&self, id: LayerId) -> SceneResult<(Point, Point)> {
        let layer = self.layer(id)?;
        if !layer.is_line() {
            return Err(not_a_line(id));
        }
        let p = layer.props;
        Ok((Point::new(p.x, p.y), Point::new(p.x + p.width, p.y + p.height)))
    }

    pub fn set_line_points(&mut self, id: LayerId, start: Point, end: Point) -> SceneResult<()> {
        let layer = self.layer_mut(id)?;
        if !layer.is_line() {
            return Err(not_a_line(id));
        }
        layer.props.x = start.x;
        layer.props.y = start.y;
        layer.props.width = end.x - start.x;
        layer.props.height = end.y - start.y;
        Ok(())
    }

    pub fn add_tag(&mut self, id: LayerId, tag: impl Into<String>) -> SceneResult<()> {
        let tag = tag.into();
        let layer = self.layer_mut(id)?;
        if !layer.has_tag(&tag) {
            layer.tags.push(tag);
        }
        Ok(())
    }

    pub fn remove_tag(&mut self, id: LayerId, tag: &str) -> SceneResult<()> {
        self.layer_mut(id)?.tags.retain(|t| t != tag);
        Ok(())
    }

    pub fn has_tag(&self, id: LayerId, tag: &str) -> bool {
        self.layers.get(id).is_some_and(|l| l.has_tag(tag))
    }

    // --- style ----------------------------------------------------------

    pub fn drawer(&self, id: LayerId) -> SceneResult<&Drawer> {
        Ok(&self.layer(id)?.drawer)
    }

    /// Edits the visible drawer. The hit drawer follows the stroke width.
    pub fn style(&mut self, id: LayerId, edit: impl FnOnce(&mut Drawer)) -> SceneResult<()> {
        let layer = self.layer_mut(id)?;
        edit(&mut layer.drawer);
        layer.hit_drawer.stroke_width = layer.drawer.stroke_width;
        Ok(())
    }

    pub fn set_caret(&mut self, id: LayerId, caret: bool) -> SceneResult<()> {
        self.style(id, |drawer| drawer.caret = caret)
    }

    // --- text -----------------------------------------------------------

    fn text_mut(&mut self, id: LayerId) -> SceneResult<&mut crate::text::TextLayer> {
        match &mut self.layer_mut(id)?.kind {
            LayerKind::Text(text) => Ok(text),
            _ => Err(SceneError::NotATextLayer {
                layer: format!("{id:?}"),
            }),
        }
    }

    pub fn text(&self, id: LayerId) -> SceneResult<&str> {
        self.layer(id)?
            .as_text()
            .map(|t| t.text())
            .ok_or_else(|| SceneError::NotATextLayer {
                layer: format!("{id:?}"),
            })
    }

    /// Replaces the text; layout is recomputed on the next render or measure.
    pub fn set_text(&mut self, id: LayerId, text: impl Into<String>) -> SceneResult<()> {
        self.text_mut(id)?.set_text(text.into());
        Ok(())
    }

    pub fn text_style(&self, id: LayerId) -> SceneResult<&TextStyle> {
        self.layer(id)?
            .as_text()
            .map(|t| t.style())
            .ok_or_else(|| SceneError::NotATextLayer {
                layer: format!("{id:?}"),
            })
    }

    pub fn set_text_style(&mut self, id: LayerId, style: TextStyle) -> SceneResult<()> {
        style.validate()?;
        self.text_mut(id)?.set_style(style);
        Ok(())
    }

    /// Current layout of a text layer, recomputed if stale.
    pub fn measure_text(&mut self, id: LayerId) -> SceneResult<&TextLayout> {
        self.text_mut(id)?;
        self.refresh_layer(id);
        self.layer(id)?
            .as_text()
            .and_then(|t| t.layout())
            .ok_or_else(|| SceneError::NotATextLayer {
                layer: format!("{id:?}"),
            })
    }

    /// Brings cached derived state (text layout, polygon points, image
    /// handles) in line with the current properties.
    pub fn prepare(&mut self) {
        let ids: Vec<LayerId> = self.layers.keys().collect();
        for id in ids {
            self.refresh_layer(id);
        }
    }

    fn refresh_layer(&mut self, id: LayerId) {
        let generation = self.measure_generation;
        let measure = self.measure.as_ref();
        let images = self.images;
        let Some(layer) = self.layers.get_mut(id) else {
            return;
        };
        match &mut layer.kind {
            LayerKind::Text(text) => {
                let layout = text.refresh(measure, generation);
                layer.props.width = layout.width;
                layer.props.height = layout.height;
            }
            LayerKind::Polygon(polygon) => {
                polygon.refresh(layer.props.width, layer.props.height);
            }
            LayerKind::Image(image) => image.resolve(images),
            _ => {}
        }
    }

    // --- images ---------------------------------------------------------

    pub fn set_image_source(&mut self, id: LayerId, source: impl Into<String>) -> SceneResult<()> {
        match &mut self.layer_mut(id)?.kind {
            LayerKind::Image(image) => {
                image.set_source(source.into());
                Ok(())
            }
            _ => Err(SceneError::NotAnImageLayer {
                layer: format!("{id:?}"),
            }),
        }
    }

    /// Delivers finished image loads as bubbling `Redraw` or `Error`
    /// events. Returns the number of events dispatched.
    pub fn poll_images(&mut self) -> usize {
        let images = self.images;
        let mut outcomes = Vec::new();
        for (id, layer) in self.layers.iter_mut() {
            let LayerKind::Image(image) = &mut layer.kind else {
                continue;
            };
            let Some(outcome) = image.poll(images) else {
                continue;
            };
            if let ImageOutcome::Loaded { width, height } = outcome {
                if layer.props.width == 0.0 {
                    layer.props.width = width as f32;
                }
                if layer.props.height == 0.0 {
                    layer.props.height = height as f32;
                }
            }
            outcomes.push((id, outcome));
        }

        let count = outcomes.len();
        for (id, outcome) in outcomes {
            let mut event = match outcome {
                ImageOutcome::Loaded { .. } => LayerEvent::redraw(id),
                ImageOutcome::Failed(message) => {
                    tracing::warn!("Image for {:?} failed to load: {}", id, message);
                    LayerEvent::error(id, message)
                }
            };
            self.dispatch(id, &mut event);
        }
        count
    }

    // --- events ---------------------------------------------------------

    pub fn on<F>(&mut self, layer: LayerId, kind: LayerEventKind, handler: F) -> SceneResult<ListenerId>
    where
        F: FnMut(&mut Scene, &mut LayerEvent) + 'static,
    {
        self.layer(layer)?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let handler: LayerHandler = Rc::new(RefCell::new(handler));
        self.listeners.entry(layer).or_default().push(ListenerEntry { id, kind, handler });
        Ok(id)
    }

    pub fn off(&mut self, layer: LayerId, listener: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(&layer) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != listener);
        before != entries.len()
    }

    pub fn off_all(&mut self, layer: LayerId) {
        self.listeners.remove(&layer);
    }

    pub fn listener_count(&self, layer: LayerId) -> usize {
        self.listeners.get(&layer).map_or(0, Vec::len)
    }

    /// Runs the listeners of `target` and then of each ancestor, until one
    /// of them stops propagation.
    pub fn dispatch(&mut self, target: LayerId, event: &mut LayerEvent) {
        event.target = target;
        let mut current = Some(target);
        while let Some(layer) = current {
            if !self.layers.contains_key(layer) {
                break;
            }
            event.current_target = layer;
            let handlers: Vec<LayerHandler> = self
                .listeners
                .get(&layer)
                .map(|entries| {
                    entries
                        .iter()
                        .filter(|e| e.kind == event.kind)
                        .map(|e| Rc::clone(&e.handler))
                        .collect()
                })
                .unwrap_or_default();

            for handler in handlers {
                match handler.try_borrow_mut() {
                    Ok(mut handler) => (&mut *handler)(self, event),
                    Err(_) => tracing::warn!("Skipping re-entrant {:?} listener on {:?}", event.kind, layer),
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
            current = self.parent(layer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonospaceMeasure;

    fn scene() -> Scene {
        let mut scene = Scene::default();
        scene.set_measure(MonospaceMeasure::default());
        scene
    }

    #[test]
    fn test_insert_allocates_identity() {
        let mut scene = scene();
        let a = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let b = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let (ia, ib) = (scene.identity(a).unwrap(), scene.identity(b).unwrap());
        assert_ne!(ia, ib);
        assert_eq!(scene.lookup_identity(ia.value()), Some(a));
        assert_eq!(scene.layer(a).unwrap().hit_drawer().fill, ia.color());
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let mut scene = scene();
        let a = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let b = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.add_child(a, r).unwrap();
        scene.add_child(b, r).unwrap();
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[r]);
        assert_eq!(scene.parent(r), Some(b));
    }

    #[test]
    fn test_readding_moves_to_front() {
        let mut scene = scene();
        let f = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let a = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let b = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.add_children(f, &[a, b]).unwrap();
        scene.add_child(f, a).unwrap();
        assert_eq!(scene.children(f), &[b, a]);
        scene.bring_to_back(a).unwrap();
        assert_eq!(scene.children(f), &[a, b]);
        scene.bring_to_front(a).unwrap();
        assert_eq!(scene.children(f), &[b, a]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut scene = scene();
        let a = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let b = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.add_child(a, b).unwrap();
        assert!(matches!(scene.add_child(b, a), Err(SceneError::Cycle { .. })));
        assert!(matches!(scene.add_child(a, a), Err(SceneError::Cycle { .. })));
    }

    #[test]
    fn test_leaf_is_not_a_container() {
        let mut scene = scene();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let s = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(matches!(
            scene.add_child(r, s),
            Err(SceneError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_destroy_frees_subtree() {
        let mut scene = scene();
        let f = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let g = scene.insert(LayerBuilder::group()).unwrap();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.add_child(f, g).unwrap();
        scene.add_child(g, r).unwrap();
        scene.on(r, LayerEventKind::PointerDown, |_, _| {}).unwrap();
        let identity = scene.identity(r).unwrap();

        scene.destroy(g).unwrap();
        assert!(!scene.contains(g));
        assert!(!scene.contains(r));
        assert!(scene.children(f).is_empty());
        assert_eq!(scene.lookup_identity(identity.value()), None);
        assert_eq!(scene.identity_count(), 1);
        assert_eq!(scene.listener_count(r), 0);
    }

    #[test]
    fn test_remove_child_clears_parent() {
        let mut scene = scene();
        let f = scene.insert(LayerBuilder::frame(0.0, 0.0, 10.0, 10.0)).unwrap();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.add_child(f, r).unwrap();
        scene.remove_child(f, r).unwrap();
        assert_eq!(scene.parent(r), None);
        scene.add_child(f, r).unwrap();
        scene.remove_all_children(f).unwrap();
        assert_eq!(scene.parent(r), None);
        assert!(scene.children(f).is_empty());
    }

    #[test]
    fn test_style_syncs_hit_stroke_width() {
        let mut scene = scene();
        let r = scene
            .insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0).dash(vec![2.0, 2.0], 0.0))
            .unwrap();
        scene.style(r, |d| d.stroke_width = 7.0).unwrap();
        let layer = scene.layer(r).unwrap();
        assert_eq!(layer.hit_drawer().stroke_width, 7.0);
        assert!(layer.hit_drawer().dash.is_none());
    }

    #[test]
    fn test_text_layout_sets_size() {
        let mut scene = scene();
        let style = TextStyle::default().with_font_size(10.0).with_line_height(1.0);
        let t = scene.insert(LayerBuilder::text(0.0, 0.0, "abc", style)).unwrap();
        assert_eq!(scene.width(t).unwrap(), 18.0);
        scene.set_text(t, "abcdef").unwrap();
        scene.measure_text(t).unwrap();
        assert_eq!(scene.width(t).unwrap(), 36.0);
        assert_eq!(scene.height(t).unwrap(), 10.0);
    }

    #[test]
    fn test_right_aligned_text_needs_max_width() {
        let mut scene = scene();
        let style = TextStyle::default().with_align(crate::text::TextAlign::Right);
        assert!(matches!(
            scene.insert(LayerBuilder::text(0.0, 0.0, "x", style)),
            Err(SceneError::RightAlignWithoutMaxWidth)
        ));
    }

    #[test]
    fn test_text_ops_reject_other_kinds() {
        let mut scene = scene();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(matches!(
            scene.set_text(r, "x"),
            Err(SceneError::NotATextLayer { .. })
        ));
    }

    #[test]
    fn test_line_points_round_trip() {
        let mut scene = scene();
        let l = scene
            .insert(LayerBuilder::line(Point::new(10.0, 10.0), Point::new(0.0, 5.0)))
            .unwrap();
        assert_eq!(scene.width(l).unwrap(), -10.0);
        let (start, end) = scene.line_points(l).unwrap();
        assert_eq!((start, end), (Point::new(10.0, 10.0), Point::new(0.0, 5.0)));
        assert_eq!(scene.bounds(l).unwrap(), Bounds::new(5.0, 10.0, 10.0, 0.0));
    }

    #[test]
    fn test_kind_specific_setters_reject_other_kinds() {
        let mut scene = scene();
        let r = scene.insert(LayerBuilder::rect(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert!(matches!(
            scene.set_line_points(r, Point::new(0.0, 0.0), Point::new(9.0, 9.0)),
            Err(SceneError::NotALineLayer { .. })
        ));
        assert!(matches!(
            scene.line_points(r),
            Err(SceneError::NotALineLayer { .. })
        ));
        assert_eq!(scene.width(r).unwrap(), 4.0);
        assert!(matches!(
            scene.set_image_source(r, "shot.png"),
            Err(SceneError::NotAnImageLayer { .. })
        ));

        let arrow = scene
            .insert(LayerBuilder::arrow(Point::new(0.0, 0.0), Point::new(4.0, 2.0)))
            .unwrap();
        scene
            .set_line_points(arrow, Point::new(1.0, 1.0), Point::new(3.0, 7.0))
            .unwrap();
        assert_eq!(scene.height(arrow).unwrap(), 6.0);
    }
}
