//! Seam between the doors and the AR session performing hit tests

use bevy_ecs::prelude::*;
use bevy_math::{Mat4, Vec2, Vec3};

use super::*;

/// Surface found by a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Transform of the hit point in world space, its local up is the surface normal
    pub world_transform: Mat4,
}

impl HitResult {
    pub fn new(world_transform: Mat4) -> Self {
        Self { world_transform }
    }

    /// Hit result at `position` on a surface with the given `normal`.
    pub fn from_position_normal(position: Vec3, normal: Vec3) -> Self {
        let rotation = bevy_math::Quat::from_rotation_arc(Vec3::Y, normal.normalize());
        Self::new(Mat4::from_rotation_translation(rotation, position))
    }

    pub fn position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }

    /// World-up rotated by the hit's rotation.
    pub fn normal(&self) -> Vec3 {
        let (_, rotation, _) = self.world_transform.to_scale_rotation_translation();
        rotation * Vec3::Y
    }
}

/// Something able to query surfaces detected by the AR session.
///
/// `point` is in normalized screen space, `(0, 0)` to `(1, 1)`.
/// Results are expected in the order of preference of the provider, an empty [Vec] means no surface was found.
pub trait HitTestProvider: Send + Sync + 'static {
    fn hit_test(&self, point: Vec2, kind: HitResultKind) -> Vec<HitResult>;
}

impl<F> HitTestProvider for F
where
    F: Fn(Vec2, HitResultKind) -> Vec<HitResult> + Send + Sync + 'static,
{
    fn hit_test(&self, point: Vec2, kind: HitResultKind) -> Vec<HitResult> {
        self(point, kind)
    }
}

/// [Resource] giving access to the AR session's hit test.
///
/// If it is missing, [NoSurfaces] is used.
#[derive(Resource)]
pub struct ArSession(pub Box<dyn HitTestProvider>);

impl ArSession {
    pub fn new(provider: impl HitTestProvider) -> Self {
        Self(Box::new(provider))
    }
}

/// [HitTestProvider] that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurfaces;

impl HitTestProvider for NoSurfaces {
    fn hit_test(&self, _point: Vec2, _kind: HitResultKind) -> Vec<HitResult> {
        Vec::new()
    }
}

/// Queries `kinds` in order and returns the first result of the first kind that has any.
///
/// Once a kind has results the following kinds are not queried, a later kind never overrides an earlier one.
pub fn first_hit(
    provider: &dyn HitTestProvider,
    point: Vec2,
    kinds: &[HitResultKind],
) -> Option<(HitResultKind, HitResult)> {
    kinds.iter().find_map(|&kind| {
        provider
            .hit_test(point, kind)
            .into_iter()
            .next()
            .map(|hit| (kind, hit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_result_reads_position_and_normal() {
        let hit = HitResult::from_position_normal(Vec3::new(1., 2., 3.), Vec3::X);
        assert!(hit.position().abs_diff_eq(Vec3::new(1., 2., 3.), 1e-5));
        assert!(hit.normal().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn first_hit_uses_kind_priority_then_provider_order() {
        let provider = |_point: Vec2, kind: HitResultKind| match kind {
            HitResultKind::ExistingPlaneExtent => Vec::new(),
            HitResultKind::ExistingPlaneInfinite => vec![
                HitResult::from_position_normal(Vec3::new(0., 0., -5.), Vec3::Y),
                HitResult::from_position_normal(Vec3::new(0., 0., -1.), Vec3::Y),
            ],
            HitResultKind::FeaturePoint => {
                vec![HitResult::from_position_normal(Vec3::ZERO, Vec3::Y)]
            }
        };
        let kinds = [
            HitResultKind::ExistingPlaneExtent,
            HitResultKind::ExistingPlaneInfinite,
            HitResultKind::FeaturePoint,
        ];

        let (kind, hit) = first_hit(&provider, SCREEN_CENTER, &kinds).unwrap();
        assert_eq!(kind, HitResultKind::ExistingPlaneInfinite);
        assert!(hit.position().abs_diff_eq(Vec3::new(0., 0., -5.), 1e-5));
    }

    #[test]
    fn first_hit_queries_the_screen_point_it_is_given() {
        let provider = |point: Vec2, _kind: HitResultKind| {
            assert_eq!(point, Vec2::new(0.5, 0.5));
            Vec::new()
        };
        assert!(first_hit(&provider, SCREEN_CENTER, &[HitResultKind::FeaturePoint]).is_none());
        assert!(first_hit(&NoSurfaces, SCREEN_CENTER, &[HitResultKind::ExistingPlaneExtent]).is_none());
    }
}
