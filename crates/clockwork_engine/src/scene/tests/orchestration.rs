use approx::assert_relative_eq;

use super::*;
use crate::actors::{BodySpriteActor, SpriteActor};
use crate::config::{CameraConfig, EngineConfig};
use crate::controllers::{CameraController, FollowMode, MenuController};
use crate::foundation::math::{Transform2D, Vec2};
use crate::physics::{BodyDef, BodyType, Material, Shape};
use crate::render::BatchCall;
use crate::scene::LifecycleState;
use crate::Engine;

fn circle(body_type: BodyType, at: Vec2) -> BodyDef {
    BodyDef::new(body_type)
        .at(at)
        .with_shape(Shape::Circle { radius: 0.5 }, Material::default())
}

#[test]
fn test_draw_order_follows_layers_then_insertion() {
    let log = new_log();
    let mut h = Harness::new();
    h.add(LayerId::Gui, Spy::new("gui", &log).boxed());
    h.add(LayerId::Background, Spy::new("bg1", &log).boxed());
    h.add(LayerId::Action2, Spy::new("act", &log).boxed());
    h.add(LayerId::Background, Spy::new("bg2", &log).boxed());
    h.add(LayerId::Foreground, Spy::new("fg", &log).boxed());

    h.frame().unwrap();
    let first = h.sprites();
    h.batch.clear();
    h.frame().unwrap();

    assert_eq!(first, vec!["bg1", "bg2", "act", "fg", "gui"]);
    assert_eq!(h.sprites(), first);
}

#[test]
fn test_inactive_and_hidden_actors() {
    let log = new_log();
    let mut h = Harness::new();
    h.add_with(LayerId::Action1, ActorDesc::new(1).inactive(), Spy::new("idle", &log).boxed());
    h.add_with(LayerId::Action1, ActorDesc::new(2).hidden(), Spy::new("ghost", &log).boxed());
    take(&log);

    h.frame().unwrap();

    assert_eq!(take(&log), vec!["update:ghost"]);
    assert!(h.sprites().is_empty());
}

#[test]
fn test_controller_hooks_wrap_the_frame() {
    let log = new_log();
    let mut h = Harness::new();
    h.scene.debug_draw = true;
    h.scene.add_controller(Box::new(Recorder::new("c1", &log)));
    h.scene.add_controller(Box::new(Recorder::new("c2", &log)));
    h.add(LayerId::Action1, Spy::new("a", &log).boxed());
    take(&log);

    h.frame().unwrap();

    assert_eq!(
        take(&log),
        vec![
            "pre_perform:c1",
            "pre_perform:c2",
            "pre_update:c1",
            "pre_update:c2",
            "update:a",
            "post_update:c1",
            "post_update:c2",
            "post_perform:c1",
            "post_perform:c2",
            "pre_draw:c1",
            "pre_draw:c2",
            "draw:a",
            "post_draw:c1",
            "post_draw:c2",
            "pre_debug:c1",
            "pre_debug:c2",
            "debug:a",
            "post_debug:c1",
            "post_debug:c2",
        ]
    );
}

#[test]
fn test_camera_matrix_applied_before_drawing() {
    let log = new_log();
    let mut h = Harness::new();
    h.scene.world_mut().camera_mut().position = Vec2::new(3.0, 4.0);
    h.add(LayerId::Action1, Spy::new("a", &log).boxed());

    h.frame().unwrap();

    let expected = h.scene.world().camera().combined();
    assert_eq!(h.batch.calls().first(), Some(&BatchCall::SetProjection(expected)));
}

#[test]
fn test_debug_pass_only_when_enabled() {
    let log = new_log();
    let mut h = Harness::new();
    h.add_with(LayerId::Action1, ActorDesc::new(1).hidden(), Spy::new("ghost", &log).boxed());
    h.add_with(LayerId::Debug, ActorDesc::new(2).inactive(), Spy::new("idle", &log).boxed());

    h.frame().unwrap();
    assert_eq!(h.gizmos.transforms_set(), 0);

    h.scene.debug_draw = true;
    h.frame().unwrap();
    assert_eq!(h.gizmos.transforms_set(), 2);
}

#[test]
fn test_controllers_disposed_with_scene() {
    let log = new_log();
    let mut h = Harness::new();
    let first = h.scene.add_controller(Box::new(Recorder::new("c1", &log)));
    h.scene.add_controller(Box::new(Recorder::new("c2", &log)));
    h.scene
        .add_controller(Box::new(MenuController::new(TextureId::new("menu.png"), Vec2::new(64.0, 32.0))));

    assert!(h.scene.controller::<MenuController>().is_some());
    assert!(h.scene.controller::<CameraController>().is_none());
    assert!(h.scene.remove_controller(first));
    assert!(!h.scene.remove_controller(first));
    assert_eq!(take(&log), vec!["dispose:c1"]);

    h.scene.dispose(&mut h.physics).unwrap();
    assert_eq!(take(&log), vec!["dispose:c2"]);
    assert_eq!(h.scene.controller_count(), 0);
}

#[test]
fn test_add_at_rejects_unknown_index() {
    let log = new_log();
    let mut h = Harness::new();

    let key = h
        .scene
        .add_at(5, ActorDesc::new(1), Spy::new("a", &log).boxed(), &mut h.physics)
        .unwrap();
    assert_eq!(h.scene.world().core(key).unwrap().layer(), LayerId::Gui);

    let err = h
        .scene
        .add_at(LayerId::COUNT, ActorDesc::new(2), Spy::new("b", &log).boxed(), &mut h.physics)
        .unwrap_err();
    assert!(matches!(err, SceneError::UnknownLayer(7)));
}

#[test]
fn test_tags_track_membership() {
    let log = new_log();
    let mut h = Harness::new();
    let a = h.add_with(LayerId::Action1, ActorDesc::new(1).with_tag("enemy"), Spy::new("a", &log).boxed());
    let b = h.add_with(LayerId::Action2, ActorDesc::new(2).with_tag("enemy"), Spy::new("b", &log).boxed());
    assert_eq!(h.scene.world().tagged("enemy"), &[a, b]);

    h.scene.world_mut().set_tag(a, Some("player")).unwrap();
    assert_eq!(h.scene.world().tagged("enemy"), &[b]);
    assert_eq!(h.scene.world().tagged("player"), &[a]);

    let enemy = h.scene.world_mut().tag("enemy");
    assert_eq!(h.scene.world().find_by_id(enemy, 2).unwrap(), Some(b));
    assert_eq!(h.scene.world().find_by_id(enemy, 1).unwrap(), None);

    h.scene.remove(b);
    h.frame().unwrap();
    assert!(h.scene.world().tagged("enemy").is_empty());
    assert!(h.scene.world().tagged("missing").is_empty());
}

#[test]
fn test_reparenting_between_actors() {
    let log = new_log();
    let mut h = Harness::new();
    let parent = h.add_with(
        LayerId::Action1,
        ActorDesc::new(1).with_transform(Transform2D::from_position(Vec2::new(10.0, 0.0))),
        Spy::new("parent", &log).boxed(),
    );
    let other = h.add(LayerId::Action1, Spy::new("other", &log).boxed());
    let child = h.add_with(
        LayerId::Action2,
        ActorDesc::new(3)
            .with_parent(parent)
            .with_transform(Transform2D::from_position(Vec2::new(1.0, 0.0))),
        Spy::new("child", &log).boxed(),
    );

    let world = h.scene.world();
    let child_node = world.core(child).unwrap().node();
    assert_relative_eq!(world.world_transform(child).unwrap()[(0, 3)], 11.0);
    assert_eq!(world.transforms().children(world.core(parent).unwrap().node()).unwrap(), &[child_node]);

    h.scene.world_mut().set_parent(child, Some(other)).unwrap();
    let world = h.scene.world();
    assert!(world.transforms().children(world.core(parent).unwrap().node()).unwrap().is_empty());
    assert_eq!(world.transforms().children(world.core(other).unwrap().node()).unwrap(), &[child_node]);
    assert_relative_eq!(world.world_transform(child).unwrap()[(0, 3)], 1.0);

    let err = h.scene.world_mut().set_parent(other, Some(child)).unwrap_err();
    assert!(matches!(err, SceneError::ParentCycle { .. }));
}

#[test]
fn test_removed_parent_hands_children_to_grandparent() {
    let log = new_log();
    let mut h = Harness::new();
    let root = h.add(LayerId::Action1, Spy::new("root", &log).boxed());
    let middle = h.add_with(LayerId::Action1, ActorDesc::new(2).with_parent(root), Spy::new("middle", &log).boxed());
    let leaf = h.add_with(LayerId::Action1, ActorDesc::new(3).with_parent(middle), Spy::new("leaf", &log).boxed());

    h.scene.remove(middle);
    h.frame().unwrap();

    let world = h.scene.world();
    let root_node = world.core(root).unwrap().node();
    let leaf_node = world.core(leaf).unwrap().node();
    assert_eq!(world.transforms().parent(leaf_node).unwrap(), Some(root_node));
    assert_eq!(world.lifecycle(leaf), LifecycleState::Live);
}

#[test]
fn test_contacts_reach_both_actors() {
    let mut engine = Engine::new(EngineConfig::default());
    let ball = BodySpriteActor::new(
        &mut *engine.physics,
        &circle(BodyType::Dynamic, Vec2::zeros()),
        TextureId::new("ball.png"),
        Rect::centered(1.0, 1.0),
    )
    .unwrap()
    .with_contact_damage(1.0);
    let crate_box = BodySpriteActor::new(
        &mut *engine.physics,
        &circle(BodyType::Static, Vec2::new(0.5, 0.0)),
        TextureId::new("crate.png"),
        Rect::centered(1.0, 1.0),
    )
    .unwrap()
    .with_health(1.0)
    .with_impact_sound("wood");

    let ball = engine
        .scene
        .add(LayerId::Action2, ActorDesc::new(1), Box::new(ball), &mut *engine.physics)
        .unwrap();
    let target = engine
        .scene
        .add(LayerId::Action2, ActorDesc::new(2), Box::new(crate_box), &mut *engine.physics)
        .unwrap();

    let mut batch = RecordingBatch::new();
    let mut gizmos = RecordingShapes::new();
    engine
        .perform_systems_job(0.016, &InputSnapshot::empty(), &mut batch, &mut gizmos)
        .unwrap();

    assert_eq!(engine.scene.world_mut().drain_sound_cues(), vec!["wood".to_string()]);
    assert_eq!(engine.scene.world().lifecycle(target), LifecycleState::Disposed);
    assert_eq!(engine.scene.world().lifecycle(ball), LifecycleState::Live);
    assert_eq!(engine.physics.body_count(), 1);
    let drawn: Vec<&str> = batch.sprites().into_iter().map(|t| t.0.as_str()).collect();
    assert_eq!(drawn, vec!["ball.png"]);

    engine.shutdown().unwrap();
    assert_eq!(engine.physics.body_count(), 0);
}

#[test]
fn test_body_pose_drives_children() {
    let mut engine = Engine::new(EngineConfig::default());
    let ball = BodySpriteActor::new(
        &mut *engine.physics,
        &circle(BodyType::Dynamic, Vec2::zeros()),
        TextureId::new("ball.png"),
        Rect::centered(1.0, 1.0),
    )
    .unwrap();
    let handle = ball.body().unwrap();
    let ball = engine
        .scene
        .add(LayerId::Action1, ActorDesc::new(1), Box::new(ball), &mut *engine.physics)
        .unwrap();
    let halo = engine
        .scene
        .add(
            LayerId::Action1,
            ActorDesc::new(2)
                .with_parent(ball)
                .with_transform(Transform2D::from_position(Vec2::new(1.0, 0.0))),
            Box::new(SpriteActor::new(TextureId::new("halo.png"), Rect::centered(2.0, 2.0))),
            &mut *engine.physics,
        )
        .unwrap();
    engine.physics.set_linear_velocity(handle, Vec2::new(10.0, 0.0)).unwrap();

    let mut batch = RecordingBatch::new();
    let mut gizmos = RecordingShapes::new();
    engine
        .perform_systems_job(0.5, &InputSnapshot::empty(), &mut batch, &mut gizmos)
        .unwrap();

    let world = engine.scene.world();
    assert_relative_eq!(world.position_of(ball, &*engine.physics).unwrap().x, 5.0, epsilon = 1e-4);
    assert_relative_eq!(world.world_transform(halo).unwrap()[(0, 3)], 6.0, epsilon = 1e-4);

    engine
        .scene
        .world_mut()
        .set_position_of(ball, Vec2::new(-2.0, 1.0), &mut *engine.physics)
        .unwrap();
    assert_relative_eq!(engine.physics.position(handle).unwrap().x, -2.0);
    assert_relative_eq!(engine.scene.world().transform(ball).unwrap().translation().y, 1.0);

    engine.shutdown().unwrap();
}

#[test]
fn test_camera_controller_follows_actor() {
    let log = new_log();
    let mut h = Harness::new();
    let target = h.add_with(
        LayerId::Action1,
        ActorDesc::new(1).with_transform(Transform2D::from_position(Vec2::new(40.0, -8.0))),
        Spy::new("hero", &log).boxed(),
    );
    let mut camera = CameraController::new(&CameraConfig::default());
    camera.follow(target, FollowMode::Static);
    h.scene.add_controller(Box::new(camera));

    h.frame().unwrap();

    let position = h.scene.world().camera().position;
    assert_relative_eq!(position.x, 40.0);
    assert_relative_eq!(position.y, -8.0);

    h.scene.remove(target);
    h.frame().unwrap();
    let controller = h.scene.controller::<CameraController>().unwrap();
    assert_eq!(controller.target(), None);
    assert_eq!(controller.mode, FollowMode::Free);
}

#[test]
fn test_actor_spawned_by_controller_updates_same_frame() {
    struct Spawner {
        log: Log,
        done: bool,
    }

    impl SceneController for Spawner {
        fn pre_update(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
            if !self.done {
                self.done = true;
                ctx.world
                    .add(LayerId::Action1, ActorDesc::new(9), Spy::new("late", &self.log).boxed(), ctx.physics)?;
            }
            Ok(())
        }
    }

    let log = new_log();
    let mut h = Harness::new();
    h.scene.add_controller(Box::new(Spawner { log: log.clone(), done: false }));

    h.frame().unwrap();

    assert_eq!(take(&log), vec!["create:late", "update:late", "draw:late"]);
}
