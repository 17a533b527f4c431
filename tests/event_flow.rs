use disksim::{Event, EventQueue, Particle, RecordingSink, Result, SimConfig, Simulation};

/// Popped event times never decrease, even while new events are scheduled
/// between pops the way the engine interleaves them.
#[test]
fn popped_times_never_decrease_under_churn() -> Result<()> {
    let mut q = EventQueue::new();
    for k in 0..40u32 {
        // Deterministic scatter of times in (0, 1).
        let t = ((k as f64) * 0.731).fract() + 1e-3;
        q.schedule(Event::wall_hit(t, k, 0)?);
    }

    let mut last = 0.0;
    let mut popped = 0u32;
    while let Some(ev) = q.pop_next_valid(|_| 0) {
        let t = ev.time_f64();
        assert!(t >= last, "time went backwards: {last} -> {t}");
        // The engine schedules only future events; mimic that here.
        if popped < 40 {
            q.schedule(Event::wall_hit(t + 0.37, 100 + popped, 0)?);
        }
        last = t;
        popped += 1;
    }
    assert_eq!(popped, 80);
    Ok(())
}

/// Newton's cradle with three disks: the middle disk's first collision
/// invalidates its pending prediction against the right disk, and the
/// rescheduled chain transfers the impulse left to right. If the stale
/// event fired instead, the final velocities would come out wrong.
#[test]
fn stale_prediction_is_discarded_mid_run() -> Result<()> {
    let cfg = SimConfig {
        big_radius: 50.0,
        small_radius: None,
        particle_radius: 0.05,
        speed: 1.0,
        mass: 1.0,
        time_limit: 0.4,
        redraw_period: 0.2,
        particle_count: 3,
        periodic: false,
        grid_cells: 1,
        neighbor_radius: Some(5.0),
        seed: Some(0),
    };
    let particles = vec![
        Particle::new(0, [-0.4, 0.0], [1.0, 0.0], 0.05, 1.0)?,
        Particle::new(1, [0.0, 0.0], [0.0, 0.0], 0.05, 1.0)?,
        Particle::new(2, [0.45, 0.0], [-1.0, 0.0], 0.05, 1.0)?,
    ];
    let mut sim = Simulation::with_particles(cfg, particles)?;
    let mut sink = RecordingSink::new();
    sim.run(&mut sink)?;

    // Collisions at t = 0.3 (0-1), 0.325 (1-2), 0.35 (0-1 again), plus
    // ticks at 0.2 and 0.4.
    assert_eq!(sim.events_processed(), 5);
    assert_eq!(sim.particles[0].collision_count, 2);
    assert_eq!(sim.particles[1].collision_count, 3);
    assert_eq!(sim.particles[2].collision_count, 1);

    assert!((sim.particles[0].v[0] + 1.0).abs() < 1e-9, "left disk exits leftward");
    assert!(sim.particles[1].v[0].abs() < 1e-9, "middle disk ends at rest");
    assert!((sim.particles[2].v[0] - 1.0).abs() < 1e-9, "right disk exits rightward");
    Ok(())
}

/// Two runs from the same seed walk the same trajectory bit for bit.
#[test]
fn same_seed_runs_are_identical() -> Result<()> {
    let cfg = SimConfig {
        particle_count: 100,
        time_limit: 1.0,
        seed: Some(99),
        ..SimConfig::default()
    };

    let mut first = Simulation::new(cfg.clone())?;
    let mut first_sink = RecordingSink::new();
    first.run(&mut first_sink)?;

    let mut second = Simulation::new(cfg)?;
    let mut second_sink = RecordingSink::new();
    second.run(&mut second_sink)?;

    assert_eq!(first.events_processed(), second.events_processed());
    assert_eq!(first_sink.frames.len(), second_sink.frames.len());
    for (a, b) in first.particles().iter().zip(second.particles()) {
        assert_eq!(a.r, b.r);
        assert_eq!(a.v, b.v);
        assert_eq!(a.collision_count, b.collision_count);
    }
    Ok(())
}

/// The engine-level counterpart of the churn test above: across a
/// collision-heavy run the emitted frames step strictly forward in time
/// and the clock lands exactly on the limit.
#[test]
fn busy_run_emits_frames_in_time_order() -> Result<()> {
    let cfg = SimConfig {
        particle_count: 100,
        time_limit: 1.0,
        redraw_period: 0.05,
        seed: Some(4242),
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(cfg)?;
    let mut sink = RecordingSink::new();
    sim.run(&mut sink)?;

    assert_eq!(sink.frames.len(), 21);
    for w in sink.frames.windows(2) {
        assert!(
            w[0].time < w[1].time,
            "snapshot times regressed: {} -> {}",
            w[0].time,
            w[1].time
        );
    }
    // Ticks alone account for twenty events; collisions only add to that.
    assert!(sim.events_processed() >= 20);
    assert_eq!(sim.time(), 1.0);
    Ok(())
}
