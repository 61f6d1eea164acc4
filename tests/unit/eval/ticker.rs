use super::*;

#[test]
fn times_increase_at_fixed_rate() {
    let ticks: Vec<FrameTick> = Ticker::new(Fps::new(30, 1).unwrap()).take(4).collect();
    assert_eq!(ticks[0].frame, FrameIndex(0));
    assert_eq!(ticks[0].time_s, 0.0);
    assert_eq!(ticks[3].frame, FrameIndex(3));
    assert!((ticks[3].time_s - 0.1).abs() < 1e-12);
    assert!(ticks.windows(2).all(|w| w[1].time_s > w[0].time_s));
}

#[test]
fn reset_restarts_at_zero() {
    let mut t = Ticker::new(Fps::new(24, 1).unwrap());
    t.tick();
    t.tick();
    t.reset();
    assert_eq!(t.tick().frame, FrameIndex(0));
    assert_eq!(t.fps(), Fps::new(24, 1).unwrap());
}
