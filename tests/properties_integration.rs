//! Property tests for pair keys, frame ranges and the separating-axis test.

use std::time::Duration;

use glam::{UVec2, Vec2};
use proptest::prelude::*;

use kinetic2d::components::animation::{Animation, AnimationMode, SheetLayout};
use kinetic2d::components::boundingbox::OrientedBoundingBox;
use kinetic2d::events::collision::PairId;
use kinetic2d::resources::store::ResourceStore;
use kinetic2d::resources::texture::TextureInfo;

const EPSILON: f32 = 1e-3;

fn mode_strategy() -> impl Strategy<Value = AnimationMode> {
    prop_oneof![
        Just(AnimationMode::Loop),
        Just(AnimationMode::Once),
        (1u32..4).prop_map(|max_loops| AnimationMode::FiniteLoop { max_loops }),
    ]
}

fn build(mode: AnimationMode, tex: &TextureInfo, duration: Duration) -> Animation {
    let frame = UVec2::splat(16);
    match mode {
        AnimationMode::Loop => Animation::looping("a", tex, frame, duration),
        AnimationMode::Once => Animation::once("a", tex, frame, duration),
        AnimationMode::FiniteLoop { max_loops } => {
            Animation::finite_loop("a", tex, frame, duration, max_loops)
        }
        AnimationMode::Static => Animation::still("a", tex, Some(frame)),
    }
}

proptest! {
    // ==== PAIR ID PROPERTIES ====

    #[test]
    fn pair_id_ignores_argument_order(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let forward = PairId::new(&a, &b);
        let backward = PairId::new(&b, &a);
        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.contains(&a));
        prop_assert!(forward.contains(&b));
        prop_assert_eq!(forward.other(&a), Some(b.as_str()));
    }

    // ==== FRAME RANGE PROPERTIES ====

    #[test]
    fn frame_index_stays_inside_effective_range(
        columns in 1u32..6,
        rows in 1u32..4,
        start in 0usize..30,
        len in 0usize..10,
        mode in mode_strategy(),
        duration_ms in 0u64..40,
        ticks in proptest::collection::vec(0u64..50, 0..80),
    ) {
        let tex = TextureInfo::new("sheet", columns * 16, rows * 16);
        let frame_count = (columns * rows) as usize;
        let mut anim = build(mode, &tex, Duration::from_millis(duration_ms))
            .with_range(start, start + len)
            .unwrap();
        let mut textures = ResourceStore::new();
        textures.upsert(tex.clone());

        let layout = SheetLayout::of(&tex, UVec2::splat(16)).unwrap();
        prop_assert_eq!(layout.frame_count(), frame_count);
        let (lo, hi) = anim.effective_range(frame_count);
        prop_assert!(lo <= hi && hi < frame_count);
        prop_assert_eq!(anim.frame_index(), lo);
        prop_assert!(anim.current_rect(&textures).is_some());

        for tick in ticks {
            anim.update(Duration::from_millis(tick), &textures);
            let index = anim.frame_index();
            prop_assert!(
                (lo..=hi).contains(&index),
                "index {} outside {}..={}", index, lo, hi
            );
            if anim.is_done() {
                prop_assert_eq!(index, hi);
            }
            let rect = anim.current_rect(&textures).unwrap();
            prop_assert!(rect.left + rect.width <= tex.width as i32);
            prop_assert!(rect.top + rect.height <= tex.height as i32);
        }
    }

    // ==== SEPARATING AXIS PROPERTIES ====

    #[test]
    fn collide_is_symmetric_with_opposite_normals(
        ax in -50.0f32..50.0, ay in -50.0f32..50.0,
        bx in -50.0f32..50.0, by in -50.0f32..50.0,
        aw in 1.0f32..30.0, ah in 1.0f32..30.0,
        bw in 1.0f32..30.0, bh in 1.0f32..30.0,
        ar in -180.0f32..180.0, br in -180.0f32..180.0,
    ) {
        let a = OrientedBoundingBox::new(Vec2::new(ax, ay), Vec2::new(aw, ah), ar);
        let b = OrientedBoundingBox::new(Vec2::new(bx, by), Vec2::new(bw, bh), br);
        match (a.collide(&b), b.collide(&a)) {
            (None, None) => {}
            (Some(ab), Some(ba)) => {
                prop_assert!(ab.depth >= 0.0);
                prop_assert!((ab.depth - ba.depth).abs() < EPSILON);
                prop_assert!((ab.normal.length() - 1.0).abs() < EPSILON);
                prop_assert!((b.center - a.center).dot(ab.normal) >= 0.0);
                prop_assert!((a.center - b.center).dot(ba.normal) >= 0.0);
            }
            (ab, ba) => prop_assert!(false, "asymmetric result {:?} vs {:?}", ab, ba),
        }
    }

    #[test]
    fn boxes_farther_than_their_extents_never_collide(
        ax in -50.0f32..50.0, ay in -50.0f32..50.0,
        aw in 1.0f32..30.0, ah in 1.0f32..30.0,
        bw in 1.0f32..30.0, bh in 1.0f32..30.0,
        ar in -180.0f32..180.0, br in -180.0f32..180.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let a = OrientedBoundingBox::new(Vec2::new(ax, ay), Vec2::new(aw, ah), ar);
        let reach = Vec2::new(aw, ah).length() + Vec2::new(bw, bh).length() + 1.0;
        let center = a.center + Vec2::from_angle(angle) * reach;
        let b = OrientedBoundingBox::new(center, Vec2::new(bw, bh), br);
        prop_assert!(a.collide(&b).is_none());
    }
}
