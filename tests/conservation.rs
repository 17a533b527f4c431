use disksim::{Particle, RecordingSink, Result, SimConfig, Simulation};

/// Kinetic energy must survive a full run: every interaction is elastic, so
/// the only admissible drift is floating-point noise.
#[test]
fn energy_conservation_across_run() -> Result<()> {
    let cfg = SimConfig {
        particle_count: 100,
        time_limit: 2.0,
        seed: Some(12345),
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(cfg)?;
    let e0 = sim.kinetic_energy();

    let mut sink = RecordingSink::new();
    sim.run(&mut sink)?;

    let e1 = sim.kinetic_energy();
    let rel = ((e1 - e0) / e0).abs();
    assert!(
        rel < 1e-9,
        "relative energy drift {rel} too large (E0={e0}, E1={e1})"
    );
    Ok(())
}

/// A mixed-mass pair collision redistributes momentum and energy without
/// creating either. Walls are pushed far beyond the time limit so the one
/// collision is the only velocity change in the run.
#[test]
fn pair_collision_conserves_momentum_and_energy() -> Result<()> {
    let cfg = SimConfig {
        big_radius: 50.0,
        small_radius: None,
        particle_radius: 0.05,
        speed: 1.0,
        mass: 1.0,
        time_limit: 1.5,
        redraw_period: 1.0,
        particle_count: 2,
        periodic: false,
        grid_cells: 1,
        neighbor_radius: Some(5.0),
        seed: Some(0),
    };
    let particles = vec![
        Particle::new(0, [-0.5, 0.0], [1.0, 0.0], 0.05, 1.0)?,
        Particle::new(1, [0.6, 0.0], [-0.9, 0.0], 0.05, 3.0)?,
    ];
    let p0: f64 = particles.iter().map(|p| p.mass * p.v[0]).sum();
    let e0: f64 = particles.iter().map(|p| p.kinetic_energy()).sum();

    let mut sim = Simulation::with_particles(cfg, particles)?;
    let mut sink = RecordingSink::new();
    sim.run(&mut sink)?;

    // One collision plus the tick at t = 1.0.
    assert_eq!(sim.events_processed(), 2);

    // Closed-form 1D elastic outcome for m = 1 vs m = 3.
    assert!((sim.particles[0].v[0] + 1.85).abs() < 1e-12);
    assert!((sim.particles[1].v[0] - 0.05).abs() < 1e-12);

    let p1: f64 = sim.particles().iter().map(|p| p.mass * p.v[0]).sum();
    let e1 = sim.kinetic_energy();
    assert!((p1 - p0).abs() < 1e-12, "momentum drift: {p0} -> {p1}");
    assert!((e1 - e0).abs() < 1e-12, "energy drift: {e0} -> {e1}");
    Ok(())
}

/// Specular reflection off the container changes direction only: the speed
/// after a wall bounce equals the speed before, at every approach angle.
#[test]
fn wall_bounce_preserves_speed_at_any_angle() -> Result<()> {
    for angle in [0.3_f64, 1.1, 2.2, 4.0, 5.5] {
        let r = [0.05 * angle.cos(), 0.05 * angle.sin()];
        let mut p = Particle::new(0, r, [-0.03, 0.07], 0.0, 1.0)?;
        let before = p.speed();
        p.bounce_off_wall()?;
        assert!(
            (p.speed() - before).abs() < 1e-12,
            "speed changed at angle {angle}: {} -> {}",
            before,
            p.speed()
        );
        assert_eq!(p.collision_count, 1);
    }
    Ok(())
}

/// The obstacle uses the same radial reflection, so speed is preserved
/// there too.
#[test]
fn obstacle_bounce_preserves_speed() -> Result<()> {
    let mut p = Particle::new(0, [0.0055, 0.0], [-0.1, 0.02], 0.0005, 1.0)?;
    let before = p.speed();
    p.bounce_off_obstacle()?;
    assert!((p.speed() - before).abs() < 1e-12);
    assert!(p.v[0] > 0.0, "radial component must flip outward");
    Ok(())
}
