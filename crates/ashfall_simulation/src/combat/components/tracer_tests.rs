//! Tests for HitVolumeTracer.

#[cfg(test)]
mod tests {
    use crate::combat::components::tracer::*;
    use crate::config::TracerTuning;
    use bevy::prelude::*;

    /// Query, которая на каждый sweep возвращает одних и тех же актёров.
    struct FixedQuery(Vec<Entity>);

    impl HitVolumeQuery for FixedQuery {
        fn sweep(&self, _volume: &AttackVolume, ignore: Entity) -> Vec<SweepHit> {
            self.0
                .iter()
                .filter(|e| **e != ignore)
                .map(|e| SweepHit {
                    entity: *e,
                    impact_point: Vec3::ZERO,
                })
                .collect()
        }
    }

    fn tracer(sockets: usize) -> HitVolumeTracer {
        let pairs = (0..sockets)
            .map(|i| SocketPair::blade(i as f32 * 0.2, 0.5, 1.5))
            .collect();
        HitVolumeTracer::new(&TracerTuning::default(), pairs)
    }

    #[test]
    fn test_idle_tracer_reports_nothing() {
        let owner = Entity::from_raw(1);
        let defender = Entity::from_raw(2);
        let mut tracer = tracer(1);

        let hits = tracer.trace(owner, &Transform::IDENTITY, &FixedQuery(vec![defender]));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_many_sockets_hit_defender_once() {
        let owner = Entity::from_raw(1);
        let defender = Entity::from_raw(2);
        let mut tracer = tracer(3);
        tracer.attacking = true;

        let query = FixedQuery(vec![owner, defender]);
        let hits = tracer.trace(owner, &Transform::IDENTITY, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, defender);

        // Следующие тики той же активации — ledger блокирует
        for _ in 0..5 {
            assert!(tracer.trace(owner, &Transform::IDENTITY, &query).is_empty());
        }

        // После reset — снова можно попасть
        tracer.reset_ledger();
        assert_eq!(tracer.trace(owner, &Transform::IDENTITY, &query).len(), 1);
    }

    #[test]
    fn test_window_close_keeps_ledger() {
        let owner = Entity::from_raw(1);
        let defender = Entity::from_raw(2);
        let mut tracer = tracer(1);
        let query = FixedQuery(vec![defender]);

        tracer.attacking = true;
        tracer.trace(owner, &Transform::IDENTITY, &query);
        tracer.attacking = false;
        tracer.attacking = true;

        assert!(tracer.has_hit(defender));
        assert!(tracer.trace(owner, &Transform::IDENTITY, &query).is_empty());
    }

    #[test]
    fn test_volume_spans_sockets() {
        let tracer = tracer(1);
        let pair = SocketPair::blade(0.0, 0.5, 1.5);
        let volume = tracer.build_volume(&pair, &Transform::from_xyz(0.0, 0.0, 10.0));

        assert!((volume.start - Vec3::new(0.0, 1.0, 9.5)).length() < 1e-5);
        assert!((volume.end - Vec3::new(0.0, 1.0, 8.5)).length() < 1e-5);
        assert!((volume.half_extents - Vec3::new(0.15, 0.15, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_hurtbox_sweep_geometry() {
        let owner = Entity::from_raw(1);
        let near = Entity::from_raw(2);
        let far = Entity::from_raw(3);
        let beside = Entity::from_raw(4);

        let hurtboxes = [
            HurtboxShape { entity: owner, center: Vec3::new(0.0, 1.0, 0.0), radius: 0.5 },
            HurtboxShape { entity: near, center: Vec3::new(0.0, 1.0, -2.2), radius: 0.5 },
            HurtboxShape { entity: far, center: Vec3::new(0.0, 1.0, -4.0), radius: 0.5 },
            HurtboxShape { entity: beside, center: Vec3::new(3.0, 1.0, -1.0), radius: 0.5 },
        ];
        let query = HurtboxSweep { hurtboxes: &hurtboxes, samples: 4 };

        let mut tracer = tracer(1);
        tracer.attacking = true;
        let hits = tracer.trace(owner, &Transform::IDENTITY, &query);

        let targets: Vec<Entity> = hits.iter().map(|h| h.target).collect();
        assert_eq!(targets, vec![near]);
        // Точка удара лежит на поверхности box, ближе к цели чем к владельцу
        assert!(hits[0].impact_point.z < -1.0);
    }

    #[test]
    fn test_sweep_follows_actor_rotation() {
        let owner = Entity::from_raw(1);
        let target = Entity::from_raw(2);

        // Актор повёрнут лицом к +X
        let transform = Transform::IDENTITY.looking_to(Vec3::X, Vec3::Y);
        let hurtboxes = [HurtboxShape { entity: target, center: Vec3::new(2.0, 1.0, 0.0), radius: 0.5 }];
        let query = HurtboxSweep { hurtboxes: &hurtboxes, samples: 4 };

        let mut tracer = tracer(1);
        tracer.attacking = true;
        assert_eq!(tracer.trace(owner, &transform, &query).len(), 1);
    }

    #[test]
    fn test_reference_rotation_orients_box() {
        let tracer = tracer(1);
        let quarter_turn = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let pair = SocketPair::blade(0.0, 0.5, 1.5).with_rotation(quarter_turn);

        let volume = tracer.build_volume(&pair, &Transform::IDENTITY);
        assert!(volume.rotation.angle_between(quarter_turn) < 1e-4);

        // Поворот актора складывается с поворотом сокета
        let turned = Transform::IDENTITY.looking_to(Vec3::X, Vec3::Y);
        let volume = tracer.build_volume(&pair, &turned);
        assert!(volume.rotation.angle_between(turned.rotation * quarter_turn) < 1e-4);
    }

    #[test]
    fn test_reference_rotation_changes_what_the_sweep_touches() {
        let owner = Entity::from_raw(1);
        let target = Entity::from_raw(2);

        // Сбоку от клинка: узкий box не достаёт, повёрнутый поперёк — достаёт
        let hurtboxes = [HurtboxShape { entity: target, center: Vec3::new(0.55, 1.0, -1.0), radius: 0.1 }];
        let query = HurtboxSweep { hurtboxes: &hurtboxes, samples: 4 };

        let mut along = tracer(1);
        along.attacking = true;
        assert!(along.trace(owner, &Transform::IDENTITY, &query).is_empty());

        let quarter_turn = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mut across = HitVolumeTracer::new(
            &TracerTuning::default(),
            vec![SocketPair::blade(0.0, 0.5, 1.5).with_rotation(quarter_turn)],
        );
        across.attacking = true;
        let hits = across.trace(owner, &Transform::IDENTITY, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, target);
    }
}
