use crate::api::types::NodeId;
use crate::components::node::NodeKind;
use crate::core::scene::Scene;
use crate::renderer::instance::{DisplayExtra, DisplayInstance, DisplayList};

/// Build the display list from the scene graph.
/// Walks depth-first in paint order from the stage, skips invisible subtrees
/// and multiplies alpha down the tree. Containers emit nothing themselves.
pub fn build_display_list(scene: &Scene, list: &mut DisplayList) {
    list.clear();
    if !scene.get(scene.stage()).is_some_and(|stage| stage.visible) {
        return;
    }

    // (node, parent global position, inherited alpha)
    let mut stack: Vec<(NodeId, glam::Vec2, f32)> = scene
        .children(scene.stage())
        .iter()
        .rev()
        .map(|&id| (id, glam::Vec2::ZERO, 1.0))
        .collect();

    while let Some((id, origin, inherited_alpha)) = stack.pop() {
        let Some(node) = scene.get(id) else { continue };
        if !node.visible {
            continue;
        }
        let pos = origin + node.pos;
        let alpha = inherited_alpha * node.alpha;

        let mut instance = DisplayInstance {
            x: pos.x,
            y: pos.y,
            width: node.size.x,
            height: node.size.y,
            scale_x: node.scale.x,
            scale_y: node.scale.y,
            rotation: node.rotation,
            alpha,
            ..Default::default()
        };

        let drawable = match &node.kind {
            NodeKind::Stage | NodeKind::Group => false,
            NodeKind::Sprite(sprite) => match sprite.current_frame() {
                Some(frame) => {
                    instance.kind = DisplayInstance::KIND_SPRITE;
                    instance.texture = frame.id.0 as f32;
                    true
                }
                None => false,
            },
            NodeKind::Text(text) => {
                instance.kind = DisplayInstance::KIND_TEXT;
                instance.texture = list.push_extra(DisplayExtra::Text {
                    content: text.content.clone(),
                    font: text.font.clone(),
                    fill: text.fill.clone(),
                }) as f32;
                true
            }
            NodeKind::Rectangle(rect) => {
                instance.kind = DisplayInstance::KIND_RECTANGLE;
                instance.texture = list.push_extra(DisplayExtra::Rectangle {
                    fill: rect.fill.clone(),
                    stroke: rect.stroke.clone(),
                    line_width: rect.line_width,
                }) as f32;
                true
            }
            NodeKind::TilingSprite(tiling) => {
                instance.kind = DisplayInstance::KIND_TILING;
                instance.texture = tiling.texture.id.0 as f32;
                instance.tile_x = tiling.tile_offset.x;
                instance.tile_y = tiling.tile_offset.y;
                true
            }
        };
        if drawable {
            list.push(instance);
        }

        stack.extend(node.children().iter().rev().map(|&child| (child, pos, alpha)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::{Texture, TextureId};
    use glam::Vec2;

    fn texture(id: u32) -> Texture {
        Texture::new(TextureId(id), 16.0, 16.0)
    }

    #[test]
    fn paint_order_and_global_positions() {
        let mut scene = Scene::new(512.0, 512.0);
        let a = scene.sprite(texture(1));
        let b = scene.sprite(texture(2));
        let group = scene.group(&[b]);
        scene.get_mut(group).unwrap().pos = Vec2::new(100.0, 50.0);
        scene.get_mut(b).unwrap().pos = Vec2::new(10.0, 10.0);
        let c = scene.sprite(texture(3));
        scene.bring_to_front(a);

        let mut list = DisplayList::new();
        build_display_list(&scene, &mut list);

        let textures: Vec<f32> = list.instances.iter().map(|i| i.texture).collect();
        assert_eq!(textures, vec![2.0, 3.0, 1.0]);
        assert_eq!((list.instances[0].x, list.instances[0].y), (110.0, 60.0));
        assert!(scene.contains(c));
    }

    #[test]
    fn invisible_subtrees_are_skipped() {
        let mut scene = Scene::new(512.0, 512.0);
        let inner = scene.sprite(texture(1));
        let group = scene.group(&[inner]);
        scene.get_mut(group).unwrap().visible = false;
        scene.sprite(texture(2));

        let mut list = DisplayList::new();
        build_display_list(&scene, &mut list);
        assert_eq!(list.instance_count(), 1);
        assert_eq!(list.instances[0].texture, 2.0);
    }

    #[test]
    fn alpha_multiplies_down_the_tree() {
        let mut scene = Scene::new(512.0, 512.0);
        let inner = scene.sprite(texture(1));
        scene.get_mut(inner).unwrap().alpha = 0.5;
        let group = scene.group(&[inner]);
        scene.get_mut(group).unwrap().alpha = 0.5;

        let mut list = DisplayList::new();
        build_display_list(&scene, &mut list);
        assert_eq!(list.instances[0].alpha, 0.25);
    }

    #[test]
    fn text_and_rectangles_use_extras() {
        let mut scene = Scene::new(512.0, 512.0);
        scene.rectangle(Vec2::new(32.0, 32.0), "red");
        scene.text("hello", "16px serif", "black", Vec2::new(5.0, 5.0));

        let mut list = DisplayList::new();
        build_display_list(&scene, &mut list);
        assert_eq!(list.instance_count(), 2);
        assert_eq!(list.instances[0].kind, DisplayInstance::KIND_RECTANGLE);
        assert_eq!(list.instances[1].kind, DisplayInstance::KIND_TEXT);
        assert_eq!(list.instances[1].texture, 1.0);
        assert!(matches!(list.extras[1], DisplayExtra::Text { .. }));
    }

    #[test]
    fn detached_nodes_are_not_drawn() {
        let mut scene = Scene::new(512.0, 512.0);
        let a = scene.sprite(texture(1));
        scene.remove(a);
        let mut list = DisplayList::new();
        build_display_list(&scene, &mut list);
        assert_eq!(list.instance_count(), 0);
    }
}
