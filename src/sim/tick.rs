//! Per-frame simulation step
//!
//! `tick` is the single entry point the display boundary invokes once per
//! frame. Ordering within a tick is observable and fixed: player motion and
//! lap accounting first (spawns append here), then every other body's motion,
//! then the collision scan over the now-current registry. A body spawned by
//! this tick's lap crossing therefore moves this tick and can end the run
//! this tick.

use super::collision::any_collision;
use super::state::{GameEvent, GamePhase, GameSession, InputIntent};
use crate::consts::*;

/// Player angular speed for the sampled intent
fn player_speed(intent: InputIntent) -> f32 {
    match intent {
        InputIntent::Accelerate => PLAYER_BASE_SPEED * ACCELERATE_FACTOR,
        InputIntent::Decelerate => PLAYER_BASE_SPEED * BRAKE_FACTOR,
        InputIntent::Coast => PLAYER_BASE_SPEED,
    }
}

/// Advance the session to `timestamp_ms`
///
/// The first call only records the timestamp baseline and performs the
/// `Idle -> Running` transition; nothing moves until the second call. Calls
/// while not `Running` preserve all state.
pub fn tick(session: &mut GameSession, intent: InputIntent, timestamp_ms: f64) {
    let Some(last) = session.last_timestamp else {
        session.last_timestamp = Some(timestamp_ms);
        if session.phase == GamePhase::Idle {
            session.begin_run();
        }
        return;
    };

    if session.phase != GamePhase::Running {
        return;
    }

    let dt = (timestamp_ms - last) as f32;
    session.last_timestamp = Some(timestamp_ms);
    debug_assert!(dt >= 0.0, "display timestamps must be monotonic");

    // Player motion; the accumulator decreases by convention
    let before = session.bodies.player.angle;
    let after = before - player_speed(intent) * dt;
    session.bodies.player.angle = after;

    // Lap crossings on the accumulator magnitude; a large dt can cross more
    // than one boundary and each crossed lap is accounted individually
    let lap_unit = session.track.lap_unit();
    let laps_before = (before.abs() / lap_unit).floor() as u32;
    let laps_after = (after.abs() / lap_unit).floor() as u32;
    for lap in (laps_before + 1)..=laps_after {
        session.laps_completed = lap;
        session.score += 1;
        session.push_event(GameEvent::LapCompleted { lap });
        log::info!("completed lap {lap}");
        if lap % SPAWN_LAP_CADENCE == 0 {
            for _ in 0..SPAWN_BATCH {
                session.spawn_body();
            }
        }
    }

    let track = session.track;
    session.bodies.player.pos = track.position(after, track.outer_radius());

    // Every other body, including any spawned above
    let inner = track.inner_radius();
    for body in session.bodies.others_mut() {
        let direction = if body.clockwise { 1.0 } else { -1.0 };
        body.angle += body.speed * dt * direction;
        body.pos = track.position(body.angle, inner);
    }

    if any_collision(session.bodies.player.pos, session.bodies.others()) {
        session.phase = GamePhase::GameOver;
        session.push_event(GameEvent::Collision {
            score: session.score,
            laps: session.laps_completed,
        });
        log::info!(
            "collision: game over at score {} after {} laps",
            session.score,
            session.laps_completed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::spawn::BodySpec;
    use crate::sim::state::BodyColor;
    use crate::sim::track::Track;
    use std::f32::consts::PI;

    fn circle_session(seed: u64) -> GameSession {
        GameSession::new(Track::circle(TRACK_RADIUS, TRACK_WIDTH).unwrap(), seed)
    }

    fn eight_session(seed: u64) -> GameSession {
        GameSession::new(
            Track::figure_eight(TRACK_RADIUS, TRACK_WIDTH, LOBE_OFFSET).unwrap(),
            seed,
        )
    }

    fn stationary_body(angle: f32) -> BodySpec {
        BodySpec {
            radius: BODY_BASE_RADIUS,
            color: BodyColor::Green,
            speed: 0.0,
            clockwise: true,
            angle,
        }
    }

    #[test]
    fn test_first_frame_establishes_baseline_without_motion() {
        let mut session = circle_session(1);
        tick(&mut session, InputIntent::Coast, 100.0);

        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.last_timestamp, Some(100.0));
        assert_eq!(session.bodies.player.angle, 0.0);
        // Idle -> Running seeds exactly one body, still at its spawn angle
        assert_eq!(session.bodies.body_count(), 1);
    }

    #[test]
    fn test_second_frame_integrates_exactly_dt() {
        let mut session = circle_session(1);
        tick(&mut session, InputIntent::Coast, 100.0);
        let body_angle = session.bodies.others()[0].angle;
        let body_speed = session.bodies.others()[0].speed;
        let dir = if session.bodies.others()[0].clockwise {
            1.0
        } else {
            -1.0
        };

        tick(&mut session, InputIntent::Coast, 116.0);
        let expected = -PLAYER_BASE_SPEED * 16.0;
        assert!((session.bodies.player.angle - expected).abs() < 1e-6);
        let expected_body = body_angle + body_speed * 16.0 * dir;
        assert!((session.bodies.others()[0].angle - expected_body).abs() < 1e-6);
    }

    #[test]
    fn test_intent_multipliers() {
        let mut session = circle_session(1);
        tick(&mut session, InputIntent::Coast, 0.0);
        tick(&mut session, InputIntent::Accelerate, 100.0);
        let accelerated = -session.bodies.player.angle;
        assert!((accelerated - PLAYER_BASE_SPEED * 2.0 * 100.0).abs() < 1e-6);

        let mut session = circle_session(1);
        tick(&mut session, InputIntent::Coast, 0.0);
        tick(&mut session, InputIntent::Decelerate, 100.0);
        let braked = -session.bodies.player.angle;
        assert!((braked - PLAYER_BASE_SPEED * 0.5 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_lap_crossing_increments_exactly_once() {
        let mut session = circle_session(1);
        tick(&mut session, InputIntent::Coast, 0.0);
        session.bodies.player.angle = -1.9 * PI;

        // Move 0.2π: magnitude crosses 2π exactly once
        let dt = (0.2 * PI / PLAYER_BASE_SPEED) as f64;
        session.last_timestamp = Some(0.0);
        tick(&mut session, InputIntent::Coast, dt);
        assert_eq!(session.laps_completed, 1);
        assert_eq!(session.score, 1);

        // A short follow-up tick must not re-count the same boundary
        tick(&mut session, InputIntent::Coast, dt + 10.0);
        assert_eq!(session.laps_completed, 1);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_scenario_one_lap_after_3696_ms() {
        // Circle of radius 225 at 0.0017 rad/ms: one lap takes 2π/0.0017 ≈ 3696 ms
        let mut session = circle_session(1);
        let mut timestamp = 0.0;
        tick(&mut session, InputIntent::Coast, timestamp);

        while timestamp < 3000.0 {
            timestamp += 1000.0;
            tick(&mut session, InputIntent::Coast, timestamp);
        }
        assert_eq!(session.laps_completed, 0);

        timestamp += 1000.0; // elapsed 4000 ms >= 3696 ms
        tick(&mut session, InputIntent::Coast, timestamp);
        assert_eq!(session.laps_completed, 1);
    }

    #[test]
    fn test_spawn_cadence_even_laps_only() {
        let mut session = circle_session(7);
        tick(&mut session, InputIntent::Coast, 0.0);
        assert_eq!(session.bodies.body_count(), 1);

        // Each tick crosses exactly one lap boundary
        let lap_ms = (session.track.lap_unit() / PLAYER_BASE_SPEED) as f64;
        let mut timestamp = 0.0;
        let mut expected = 1;
        for lap in 1..=6u32 {
            timestamp += lap_ms * 1.01;
            tick(&mut session, InputIntent::Coast, timestamp);
            assert_eq!(session.laps_completed, lap);
            if lap % SPAWN_LAP_CADENCE == 0 {
                expected += SPAWN_BATCH;
            }
            assert_eq!(session.bodies.body_count(), expected);
        }
        // Spawns fired at laps 2, 4, 6: one seed body plus three batches
        assert_eq!(session.bodies.body_count(), 1 + 3 * SPAWN_BATCH);
    }

    #[test]
    fn test_collision_ends_run_and_freezes_state() {
        // Narrow track: rings 20 apart, well inside the collision threshold
        let mut session = GameSession::new(Track::circle(100.0, 10.0).unwrap(), 3);
        tick(&mut session, InputIntent::Coast, 0.0);
        session.bodies.clear_others();

        // Park a stationary body exactly where the player will be
        let dt = 100.0;
        let player_after = -PLAYER_BASE_SPEED * dt as f32;
        let pos = session
            .track
            .position(player_after, session.track.inner_radius());
        session.bodies.add(stationary_body(player_after), pos);

        tick(&mut session, InputIntent::Coast, dt);
        assert_eq!(session.phase, GamePhase::GameOver);
        let events = session.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Collision { .. }))
        );

        // Further ticks preserve all state
        let angle = session.bodies.player.angle;
        let last = session.last_timestamp;
        tick(&mut session, InputIntent::Accelerate, dt + 500.0);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.bodies.player.angle, angle);
        assert_eq!(session.last_timestamp, last);
    }

    #[test]
    fn test_same_tick_spawn_participates_in_collision() {
        // Tiny track: every point of the inner ring is within the threshold
        // of every point of the outer ring, so any spawn collides immediately
        let mut session = GameSession::new(Track::circle(10.0, 5.0).unwrap(), 11);
        tick(&mut session, InputIntent::Coast, 0.0);
        session.bodies.clear_others();

        // Park the accumulator just short of the lap-2 boundary
        let lap_unit = session.track.lap_unit();
        session.bodies.player.angle = -(2.0 * lap_unit - 0.01);

        tick(&mut session, InputIntent::Coast, 100.0);
        assert_eq!(session.laps_completed, 2);
        assert_eq!(session.bodies.body_count(), SPAWN_BATCH);
        // The bodies spawned by this tick's lap crossing ended this tick
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_opposite_sweeps_coincide_after_half_track() {
        let mut session = circle_session(5);
        tick(&mut session, InputIntent::Coast, 0.0);
        session.bodies.clear_others();

        let start = 0.3;
        let speed = 0.001;
        let mut cw = stationary_body(start);
        cw.speed = speed;
        cw.clockwise = true;
        let mut ccw = stationary_body(start);
        ccw.speed = speed;
        ccw.clockwise = false;
        let inner = session.track.inner_radius();
        let pos = session.track.position(start, inner);
        session.bodies.add(cw, pos);
        session.bodies.add(ccw, pos);

        // Half the track each: π of sweep at 0.001 rad/ms
        let dt = (PI / speed) as f64;
        tick(&mut session, InputIntent::Coast, dt);
        let others = session.bodies.others();
        assert!((others[0].pos - others[1].pos).length() < 1e-2);
    }

    #[test]
    fn test_reset_after_game_over_restarts_cleanly() {
        let mut session = GameSession::new(Track::circle(10.0, 5.0).unwrap(), 11);
        tick(&mut session, InputIntent::Coast, 0.0);
        tick(&mut session, InputIntent::Coast, 100.0);
        assert_eq!(session.phase, GamePhase::GameOver);

        session.reset();
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.laps_completed, 0);
        assert_eq!(session.bodies.body_count(), 1);

        // The tick after a reset is a baseline frame: no motion
        tick(&mut session, InputIntent::Coast, 5000.0);
        assert_eq!(session.bodies.player.angle, 0.0);
        tick(&mut session, InputIntent::Coast, 5016.0);
        assert!(session.bodies.player.angle < 0.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn intent_from(choice: u8) -> InputIntent {
            match choice % 3 {
                0 => InputIntent::Accelerate,
                1 => InputIntent::Decelerate,
                _ => InputIntent::Coast,
            }
        }

        proptest! {
            #[test]
            fn score_and_laps_never_decrease(
                seed in any::<u64>(),
                frames in prop::collection::vec((1.0f64..2000.0, any::<u8>()), 1..60),
            ) {
                let mut session = eight_session(seed);
                let mut timestamp = 0.0;
                tick(&mut session, InputIntent::Coast, timestamp);

                let mut last_score = session.score;
                let mut last_laps = session.laps_completed;
                for (dt, choice) in frames {
                    timestamp += dt;
                    tick(&mut session, intent_from(choice), timestamp);
                    prop_assert!(session.score >= last_score);
                    prop_assert!(session.laps_completed >= last_laps);
                    last_score = session.score;
                    last_laps = session.laps_completed;
                }
            }

            #[test]
            fn player_accumulator_is_monotonically_decreasing(
                frames in prop::collection::vec((1.0f64..500.0, any::<u8>()), 1..40),
            ) {
                let mut session = circle_session(0);
                let mut timestamp = 0.0;
                tick(&mut session, InputIntent::Coast, timestamp);

                let mut last_angle = session.bodies.player.angle;
                for (dt, choice) in frames {
                    timestamp += dt;
                    tick(&mut session, intent_from(choice), timestamp);
                    if session.phase != GamePhase::Running {
                        break;
                    }
                    prop_assert!(session.bodies.player.angle < last_angle);
                    last_angle = session.bodies.player.angle;
                }
            }
        }
    }
}
