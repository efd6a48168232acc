//! Brick Arena headless demo
//!
//! Runs a scripted minute of play against a recording canvas and logs a
//! summary. Usage: `brick-arena [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use brick_arena::Tuning;
    use brick_arena::consts::SIM_DT;
    use brick_arena::render::{Draw, FixedTextures, RecordingCanvas, Textures};
    use brick_arena::sim::enemy::{BasicKind, EnemySpawn, MiniBossVariant};
    use brick_arena::sim::{BoosterKind, GameEvent, GamePhase, GameState, TickInput, tick};
    use glam::Vec2;

    /// Presentation frame time; the sim catches up in fixed substeps
    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SUBSTEPS: u32 = 8;
    const DEMO_SECONDS: f32 = 60.0;
    const DEFAULT_SEED: u64 = 0xB21C;

    enum Scripted {
        Enemy(EnemySpawn),
        Booster(BoosterKind),
    }

    /// (time, what, offset from arena center)
    fn script() -> Vec<(f32, Scripted, Vec2)> {
        use Scripted::*;
        vec![
            (1.0, Enemy(EnemySpawn::Basic(BasicKind::Base)), Vec2::new(-600.0, -300.0)),
            (2.0, Enemy(EnemySpawn::Basic(BasicKind::Pebblin)), Vec2::new(600.0, -300.0)),
            (4.0, Enemy(EnemySpawn::Basic(BasicKind::Slime)), Vec2::new(0.0, 420.0)),
            (8.0, Enemy(EnemySpawn::Centipede), Vec2::new(-700.0, 0.0)),
            (15.0, Booster(BoosterKind::SpeedUp), Vec2::new(120.0, 0.0)),
            (
                20.0,
                Enemy(EnemySpawn::MiniBoss {
                    variant: MiniBossVariant::Two,
                    leader: true,
                }),
                Vec2::new(700.0, 300.0),
            ),
            (
                21.0,
                Enemy(EnemySpawn::MiniBoss {
                    variant: MiniBossVariant::Four,
                    leader: false,
                }),
                Vec2::new(760.0, 360.0),
            ),
            (30.0, Enemy(EnemySpawn::Boss), Vec2::new(0.0, -480.0)),
            (35.0, Booster(BoosterKind::Healing), Vec2::new(-120.0, 60.0)),
            (40.0, Enemy(EnemySpawn::Fractal), Vec2::new(650.0, 0.0)),
        ]
    }

    /// Circle the arena center and aim at the closest enemy
    fn scripted_input(state: &GameState) -> TickInput {
        let center = state.arena_size() * 0.5;
        let angle = state.elapsed * 0.5;
        let orbit_point = center + Vec2::new(angle.cos(), angle.sin()) * 150.0;
        let aim_target = state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.pos())
            .min_by(|a, b| {
                a.distance_squared(state.player.pos)
                    .total_cmp(&b.distance_squared(state.player.pos))
            });

        TickInput {
            move_dir: orbit_point - state.player.pos,
            aim_target,
            pause: false,
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let seed = match args.next().map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => seed,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid seed: {e}");
                DEFAULT_SEED
            }
            None => DEFAULT_SEED,
        };

        log::info!("Brick Arena demo starting (seed {seed})");
        let mut state = GameState::with_tuning(seed, tuning);
        let textures = Textures::load_all(&mut FixedTextures::everything());
        let mut canvas = RecordingCanvas::default();

        let center = state.arena_size() * 0.5;
        let mut pending = script().into_iter().peekable();
        let mut accumulator = 0.0;
        let mut frames = 0u64;
        let mut draw_calls = 0usize;
        let mut hits_taken = 0u32;
        let mut dodges = 0u32;

        while state.elapsed < DEMO_SECONDS && state.phase != GamePhase::GameOver {
            while let Some((_, what, offset)) = pending.next_if(|(at, _, _)| *at <= state.elapsed) {
                let pos = center + offset;
                match what {
                    Scripted::Enemy(kind) => {
                        state.spawn_enemy(kind, pos);
                    }
                    Scripted::Booster(kind) => {
                        state.spawn_booster(kind, pos);
                    }
                }
            }

            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = scripted_input(&state);
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::PlayerHit { .. } => hits_taken += 1,
                    GameEvent::PlayerDodged => dodges += 1,
                    GameEvent::LevelUp { level } => log::info!("Reached level {level}"),
                    _ => {}
                }
            }

            canvas.clear();
            state.draw(&mut canvas, &textures);
            draw_calls += canvas.calls.len();
            frames += 1;
        }

        log::info!(
            "Demo finished after {:.1}s: {} kills, level {}, health {}/{}, shield {}, {} weapons, {} materials",
            state.elapsed,
            state.kills,
            state.player.level,
            state.player.health,
            state.player.stats.max_health,
            state.player.shield,
            state.player.weapons.len(),
            state.player.stats.materials,
        );
        log::info!(
            "{hits_taken} hits taken, {dodges} dodged, {} enemies left, {:.0} draw calls per frame",
            state.living_enemies(),
            draw_calls as f64 / frames.max(1) as f64
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
